// assets.rs - Facade image slots
//
// Building facade art is decoded by the host and pushed in whenever it
// arrives. The renderer polls readiness every draw; a slot that is not
// loaded yet (or failed) just means the procedural facade is used. A
// frame must render correctly no matter which state a slot is in.

/// Number of facade variants the host may provide.
pub const FACADE_SLOTS: usize = 2;

pub enum AssetState {
    NotLoaded,
    Loaded(Image),
    Failed,
}

pub struct Image {
    pub w: u32,
    pub h: u32,
    pub rgba: Vec<u8>,
}

pub struct FacadeAssets {
    slots: [AssetState; FACADE_SLOTS],
}

impl FacadeAssets {
    pub fn new() -> Self {
        Self {
            slots: [const { AssetState::NotLoaded }; FACADE_SLOTS],
        }
    }

    /// Install decoded RGBA pixels for a slot. A bad slot index or a
    /// pixel buffer that does not match the dimensions marks the slot
    /// failed; the renderer keeps falling back silently.
    pub fn load(&mut self, slot: usize, w: u32, h: u32, rgba: &[u8]) {
        let Some(entry) = self.slots.get_mut(slot) else {
            log::warn!("facade slot {slot} out of range");
            return;
        };
        if w == 0 || h == 0 || rgba.len() != (w * h * 4) as usize {
            log::warn!("facade slot {slot} rejected: {w}x{h}, {} bytes", rgba.len());
            *entry = AssetState::Failed;
            return;
        }
        log::debug!("facade slot {slot} loaded ({w}x{h})");
        *entry = AssetState::Loaded(Image { w, h, rgba: rgba.to_vec() });
    }

    /// Host-side load error for a slot.
    pub fn mark_failed(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = AssetState::Failed;
        }
    }

    /// Image for a slot, if it has finished loading.
    #[inline]
    pub fn ready(&self, slot: usize) -> Option<&Image> {
        match self.slots.get(slot) {
            Some(AssetState::Loaded(img)) => Some(img),
            _ => None,
        }
    }
}

impl Default for FacadeAssets {
    fn default() -> Self {
        Self::new()
    }
}
