/// Change notifications emitted by [`Scene`](super::Scene) setters, so a UI
/// layer can refresh its widgets without reaching into scene fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// Eye, target or up vector changed: the view matrix is different.
    CameraChanged,
    /// Field of view, aspect or clip planes changed.
    ProjectionChanged,
    LightAdded(usize),
    LightChanged(usize),
    MaterialChanged,
    OptionsChanged,
}

type Callback = Box<dyn FnMut(&SceneEvent)>;

#[derive(Default)]
pub struct Observers {
    callbacks: Vec<Callback>,
}

impl Observers {
    pub fn subscribe(&mut self, callback: impl FnMut(&SceneEvent) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn emit(&mut self, event: SceneEvent) {
        log::trace!("Scene event: {:?}", event);
        for callback in &mut self.callbacks {
            callback(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
