use crate::canvas::CanvasTarget;
use crate::dom::Listener;
use crate::frame::RafDriver;
use fnv::FnvHashMap;
use fx_core::{run_frame, Effect, PointerInput, Surface};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Everything one mounted effect owns while it is drawing.
pub struct Scene {
    pub effect: Box<dyn Effect>,
    pub surface: Surface,
    pub target: CanvasTarget,
}

/// Filled in once setup finishes; code lens mounts stay empty until the
/// image has loaded.
pub type SceneSlot = Rc<RefCell<Option<Scene>>>;

/// A live mount on one canvas.
pub struct Mount {
    token: u64,
    pub driver: Rc<RafDriver>,
    pub scene: SceneSlot,
    /// Cleared on teardown. Async callbacks check it before touching the slot.
    pub alive: Rc<Cell<bool>>,
    /// Pointer targets seen so far, kept even while the slot is empty.
    pub input: Rc<Cell<PointerInput>>,
    pub listeners: Vec<Listener>,
}

impl Mount {
    fn new(token: u64) -> Self {
        Self {
            token,
            driver: RafDriver::new(),
            scene: Rc::new(RefCell::new(None)),
            alive: Rc::new(Cell::new(true)),
            input: Rc::new(Cell::new(PointerInput::default())),
            listeners: Vec::new(),
        }
    }

    fn teardown(self) {
        self.alive.set(false);
        self.driver.stop();
        drop(self.listeners);
        self.scene.borrow_mut().take();
    }
}

thread_local! {
    static MOUNTS: RefCell<FnvHashMap<String, Mount>> = RefCell::new(FnvHashMap::default());
    static NEXT_TOKEN: Cell<u64> = const { Cell::new(1) };
}

/// Tear down whatever is mounted on `canvas_id` and register a fresh mount.
/// `setup` fills the mount in before it becomes visible to other calls.
pub fn replace_mount(canvas_id: &str, setup: impl FnOnce(&mut Mount) -> anyhow::Result<()>) -> anyhow::Result<EffectHandle> {
    unmount_id(canvas_id, None);
    let token = NEXT_TOKEN.with(|t| {
        let token = t.get();
        t.set(token.wrapping_add(1));
        token
    });
    let mut mount = Mount::new(token);
    if let Err(e) = setup(&mut mount) {
        mount.teardown();
        return Err(e);
    }
    MOUNTS.with(|m| m.borrow_mut().insert(canvas_id.to_string(), mount));
    log::info!("[mount] #{} mounted (token {})", canvas_id, token);
    Ok(EffectHandle {
        canvas_id: canvas_id.to_string(),
        token,
    })
}

/// Remove the mount on `canvas_id`. With `Some(token)` only that exact mount
/// is removed, so a stale handle cannot tear down a newer one.
fn unmount_id(canvas_id: &str, token: Option<u64>) -> bool {
    let removed = MOUNTS.with(|m| {
        let mut mounts = m.borrow_mut();
        match (mounts.get(canvas_id), token) {
            (Some(existing), Some(t)) if existing.token != t => None,
            (Some(_), _) => mounts.remove(canvas_id),
            (None, _) => None,
        }
    });
    match removed {
        Some(mount) => {
            log::info!("[mount] #{} unmounted (token {})", canvas_id, mount.token);
            mount.teardown();
            true
        }
        None => false,
    }
}

pub fn is_mounted(canvas_id: &str) -> bool {
    MOUNTS.with(|m| m.borrow().contains_key(canvas_id))
}

/// Put `scene` into the slot and start ticking it. Pointer input recorded
/// before the scene existed is applied first.
pub fn start_scene(driver: &RafDriver, slot: &SceneSlot, input: &Cell<PointerInput>, mut scene: Scene) {
    log::info!("[mount] starting {}", scene.effect.name());
    if let Some(tracker) = scene.effect.pointer_mut() {
        input.get().replay(tracker);
    }
    *slot.borrow_mut() = Some(scene);
    let slot = slot.clone();
    driver.start(move |time| {
        let mut guard = slot.borrow_mut();
        let Some(scene) = guard.as_mut() else {
            return;
        };
        let Scene {
            effect,
            surface,
            target,
        } = scene;
        run_frame(effect.as_mut(), time, surface);
        target.present(surface);
    });
}

/// Returned to JS by every `mount_*` export.
#[wasm_bindgen]
pub struct EffectHandle {
    canvas_id: String,
    token: u64,
}

#[wasm_bindgen]
impl EffectHandle {
    #[wasm_bindgen(getter, js_name = canvasId)]
    pub fn canvas_id(&self) -> String {
        self.canvas_id.clone()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        MOUNTS.with(|m| m.borrow().get(&self.canvas_id).map(|mount| mount.token) == Some(self.token))
    }

    /// Stop the frame loop and drop listeners. Calling it twice is harmless.
    pub fn unmount(&self) {
        unmount_id(&self.canvas_id, Some(self.token));
    }
}
