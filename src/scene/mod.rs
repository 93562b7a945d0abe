//! Scene storage and selection.
//!
//! A [`Scene`] owns the editable objects of a viewport and the single
//! selection. Objects live in a `hecs` world as `(ObjectId, SceneObject)`
//! entities; callers only ever see the [`ObjectId`].
//!
//! Picking is synchronous and read-only, so the object set cannot change
//! while a pick is running.
//!
//! # Example
//!
//! ```
//! use orbitview::{MeshData, Ray, Scene, SceneObject, Vec3};
//!
//! let mut scene = Scene::new();
//! let cube = scene.add_object(SceneObject::new("cube").with_mesh(MeshData::cube(1.0)));
//!
//! // Click on the cube, then on empty space.
//! scene.pick_and_select(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z));
//! assert_eq!(scene.selected(), Some(cube));
//!
//! scene.pick_and_select(&Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::NEG_Z));
//! assert_eq!(scene.selected(), None);
//! ```

mod object;

pub use object::{ObjectId, SceneObject};

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::camera::Camera;
use crate::picking::{self, PickResult, Ray};

/// The editable objects of a scene plus its single selection.
#[derive(Default)]
pub struct Scene {
    world: hecs::World,
    entities: HashMap<ObjectId, hecs::Entity>,
    next_id: u64,
    selected: Option<ObjectId>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.entities.len())
            .field("next_id", &self.next_id)
            .field("selected", &self.selected)
            .finish()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object and return its new id.
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        // Selection is owned by the scene.
        object.set_selected(false);
        log::debug!("adding {:?} as {id}", object.name);
        let entity = self.world.spawn((id, object));
        self.entities.insert(id, entity);
        id
    }

    /// Remove an object, clearing the selection if it was selected.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let entity = self.entities.remove(&id)?;
        let object = self.world.remove_one::<SceneObject>(entity).ok();
        if let Err(err) = self.world.despawn(entity) {
            log::warn!("object {id} was already despawned: {err}");
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("removed {id}");
        object.map(|mut object| {
            object.set_selected(false);
            object
        })
    }

    /// Remove every object and drop the selection. Ids keep counting up.
    pub fn clear(&mut self) {
        let count = self.entities.len();
        self.world.clear();
        self.entities.clear();
        self.selected = None;
        log::debug!("cleared {count} objects");
    }

    pub fn get(&self, id: ObjectId) -> Option<hecs::Ref<'_, SceneObject>> {
        let entity = *self.entities.get(&id)?;
        self.world.get::<&SceneObject>(entity).ok()
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let entity = *self.entities.get(&id)?;
        self.world.query_one_mut::<&mut SceneObject>(entity).ok()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All object ids in insertion order.
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// First object (in insertion order) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        let mut query = self.world.query::<(&ObjectId, &SceneObject)>();
        query
            .iter()
            .filter(|(_, (_, object))| object.name == name)
            .map(|(_, (id, _))| *id)
            .min()
    }

    /// The underlying ECS world, for hosts that attach their own components.
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    // --- Selection ---

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Make `id` the only selected object. Returns false if it does not exist.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            log::warn!("cannot select missing object {id}");
            return false;
        }
        if self.selected == Some(id) {
            return true;
        }

        self.clear_selection();
        if let Some(object) = self.get_mut(id) {
            object.set_selected(true);
        }
        self.selected = Some(id);
        log::debug!("selected {id}");
        true
    }

    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(object) = self.get_mut(previous) {
                object.set_selected(false);
            }
            log::debug!("deselected {previous}");
        }
    }

    // --- Picking ---

    /// Closest visible object hit by `ray`. Does not change the selection.
    pub fn pick(&self, ray: &Ray) -> PickResult {
        let mut query = self.world.query::<(&ObjectId, &SceneObject)>();
        let candidates = query
            .iter()
            .filter(|(_, (_, object))| object.visible)
            .map(|(_, (id, object))| (*id, object));
        picking::pick(ray, candidates)
    }

    /// Pick with `ray` and apply the result: a hit selects that object, a
    /// miss clears the selection.
    pub fn pick_and_select(&mut self, ray: &Ray) -> PickResult {
        let hit = self.pick(ray);
        match hit {
            Some(hit) => {
                self.select(hit.object);
            }
            None => self.clear_selection(),
        }
        hit
    }

    /// Select whatever is under a window-space cursor position.
    ///
    /// Cursors outside the camera's viewport are ignored and leave the
    /// selection untouched.
    pub fn select_at_cursor(&mut self, camera: &Camera, cursor: Vec2) -> PickResult {
        let viewport = camera.viewport();
        if viewport.is_empty() || !viewport.contains(cursor) {
            return None;
        }
        let local = viewport.to_local(cursor);
        let ray = camera.screen_to_world_ray(local.x, local.y);
        self.pick_and_select(&ray)
    }
}
