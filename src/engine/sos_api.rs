use super::Engine;

use crate::{api::SosAPI, render::Renderer};

impl<R: Renderer> SosAPI for Engine<R> {
    #[tracing::instrument(skip(self))]
    fn toggle_sos_modal(&mut self) -> bool {
        let visible = !self.renderer.is_modal_visible();
        self.renderer.set_modal_visible(visible);

        visible
    }
}

#[test]
fn double_toggle_restores_visibility() {
    let mut engine = super::testing::engine();
    assert!(!engine.renderer().is_modal_visible());

    assert!(engine.toggle_sos_modal());
    assert!(engine.renderer().is_modal_visible());

    assert!(!engine.toggle_sos_modal());
    assert!(!engine.renderer().is_modal_visible());
}

#[test]
fn toggle_works_without_location() {
    use crate::api::LocationAPI;

    let mut engine = super::testing::engine();
    engine.toggle_sos_modal();

    assert_eq!(engine.current_location(), None);
    assert!(engine.renderer().alerts().is_empty());
}
