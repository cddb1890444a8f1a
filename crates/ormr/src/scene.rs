//! # Scene Files — JSON Load and Save
//!
//! A scene is a JSON document describing entities and the components to
//! attach to them. The loader populates already-registered component kinds;
//! it performs no resource IO of its own (geometry/material/texture indices
//! belong to the external asset pipeline).
//!
//! ```json
//! {
//!   "entities": [
//!     { "name": "floor",
//!       "transform": { "translate": [0, -0.5, 0], "scale": [20, 1, 20] },
//!       "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [0.5, 0.5, 0.5] },
//!       "tags": ["ground"] },
//!     { "name": "lamp",
//!       "transform": { "translate": [0, 3, 0], "parent": "floor" },
//!       "light": { "color": [1, 0.9, 0.7] } }
//!   ]
//! }
//! ```
//!
//! Parent links are names, resolved in a second pass after every entity
//! exists, so declaration order doesn't matter. Unknown parent names and
//! parent cycles are load errors — cycles must be impossible by
//! construction because the transform hierarchy does not guard against
//! them at query time.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::behavior::{MovingPlatform, Rotator, Tag};
use crate::collision::{Collider, ColliderShape};
use crate::ecs::{EntityId, Store};
use crate::gui::{GuiAnchor, GuiText};
use crate::math::{DEG2RAD, EulerRot, Mat4, Quat, RAD2DEG, Vec2, Vec3};
use crate::render_data::{Light, Mesh};
use crate::transform::Transform;

/// What can go wrong loading or saving a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entity \"{child}\" names unknown parent \"{parent}\"")]
    UnknownParent { child: String, parent: String },
    #[error("transform parent cycle through \"{0}\"")]
    ParentCycle(String),
}

// ── Schema ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneFile {
    pub entities: Vec<SceneEntity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneEntity {
    #[serde(default)]
    pub name: String,
    pub transform: SceneTransform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<SceneMesh>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collider: Option<SceneCollider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<SceneLight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotator: Option<SceneRotator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<ScenePlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gui_text: Option<SceneGuiText>,
}

/// Translate/rotate/scale triplet; `rotate` is Euler XYZ in degrees, the
/// way scene authors write it.
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneTransform {
    pub translate: Vec3,
    #[serde(default)]
    pub rotate: Vec3,
    #[serde(default = "vec3_one")]
    pub scale: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

fn vec3_one() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneCollider {
    Box { center: Vec3, halfwidth: Vec3 },
    Ray { direction: Vec3, max_distance: f32 },
}

/// Resource indices owned by the external asset pipeline.
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneMesh {
    pub geometry: usize,
    pub material: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneLight {
    pub color: Vec3,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneRotator {
    pub speed: f32,
    pub axis: Vec3,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScenePlatform {
    pub speed: f32,
    pub dir: Vec3,
    pub period: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneGuiText {
    pub text: String,
    #[serde(default)]
    pub font_face: String,
    #[serde(default = "default_font_size")]
    pub font_size: i32,
    #[serde(default = "vec3_one")]
    pub color: Vec3,
    #[serde(default)]
    pub anchor: GuiAnchor,
    #[serde(default)]
    pub offset: Vec2,
}

fn default_font_size() -> i32 {
    32
}

// ── Load ─────────────────────────────────────────────────────────────────

/// Parse `json` and populate the store. Returns the created entity ids in
/// declaration order.
pub fn load_scene(store: &mut Store, json: &str) -> Result<Vec<EntityId>, SceneError> {
    let file: SceneFile = serde_json::from_str(json)?;
    load_scene_data(store, &file)
}

/// [`load_scene`] from a file on disk.
pub fn load_scene_file(store: &mut Store, path: impl AsRef<Path>) -> Result<Vec<EntityId>, SceneError> {
    let json = std::fs::read_to_string(path)?;
    load_scene(store, &json)
}

/// Populate the store from an in-memory [`SceneFile`].
pub fn load_scene_data(store: &mut Store, file: &SceneFile) -> Result<Vec<EntityId>, SceneError> {
    let mut created = Vec::with_capacity(file.entities.len());
    let mut child_parent: Vec<(String, String)> = Vec::new();

    for scene_entity in &file.entities {
        let id = store.create_entity(&scene_entity.name);
        created.push(id);

        let st = &scene_entity.transform;
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            st.rotate.x * DEG2RAD,
            st.rotate.y * DEG2RAD,
            st.rotate.z * DEG2RAD,
        );
        store
            .component_mut::<Transform>(id)
            .expect("create_entity attaches a transform")
            .local = Mat4::from_scale_rotation_translation(st.scale, rotation, st.translate);

        if let Some(parent) = &st.parent {
            child_parent.push((scene_entity.name.clone(), parent.clone()));
        }

        if let Some(scene_mesh) = &scene_entity.mesh {
            let mesh = store.create_component::<Mesh>(id);
            mesh.geometry = scene_mesh.geometry;
            mesh.material = scene_mesh.material;
        }

        if let Some(scene_collider) = &scene_entity.collider {
            let collider = store.create_component::<Collider>(id);
            match *scene_collider {
                SceneCollider::Box { center, halfwidth } => {
                    collider.shape = ColliderShape::Box;
                    collider.local_center = center;
                    collider.local_halfwidth = halfwidth;
                }
                SceneCollider::Ray {
                    direction,
                    max_distance,
                } => {
                    collider.shape = ColliderShape::Ray;
                    collider.direction = direction;
                    collider.max_distance = max_distance;
                }
            }
        }

        if let Some(scene_light) = &scene_entity.light {
            store.create_component::<Light>(id).color = scene_light.color;
        }

        if !scene_entity.tags.is_empty() {
            store.create_component::<Tag>(id).tags = scene_entity.tags.clone();
        }

        if let Some(scene_rotator) = &scene_entity.rotator {
            let rotator = store.create_component::<Rotator>(id);
            rotator.speed = scene_rotator.speed;
            rotator.axis = scene_rotator.axis;
        }

        if let Some(scene_platform) = &scene_entity.platform {
            let platform = store.create_component::<MovingPlatform>(id);
            platform.speed = scene_platform.speed;
            platform.dir = scene_platform.dir;
            platform.period = scene_platform.period;
        }

        if let Some(scene_text) = &scene_entity.gui_text {
            let text = store.create_component::<GuiText>(id);
            text.text = scene_text.text.clone();
            text.font_face = scene_text.font_face.clone();
            text.font_size = scene_text.font_size;
            text.color = scene_text.color;
            text.anchor = scene_text.anchor;
            text.offset = scene_text.offset;
        }
    }

    // Second pass: every entity exists now, so parent names can resolve
    // regardless of declaration order.
    for (child, parent) in &child_parent {
        let parent_id = store.entity(parent).ok_or_else(|| SceneError::UnknownParent {
            child: child.clone(),
            parent: parent.clone(),
        })?;
        let parent_slot = store
            .component_slot::<Transform>(parent_id)
            .expect("every entity has a transform");
        let child_id = store.entity(child).expect("child was created above");
        store
            .component_mut::<Transform>(child_id)
            .expect("every entity has a transform")
            .parent = Some(parent_slot);
    }

    reject_parent_cycles(store)?;

    info!("scene loaded: {} entities", created.len());
    Ok(created)
}

/// Walk each transform's parent chain with a step budget of the array
/// length; exceeding it means the chain loops.
fn reject_parent_cycles(store: &Store) -> Result<(), SceneError> {
    let transforms = store.all_components::<Transform>();
    for transform in transforms {
        let mut cursor = transform.parent;
        let mut steps = 0usize;
        while let Some(parent_slot) = cursor {
            steps += 1;
            if steps > transforms.len() {
                let name = store.entity_record(transform.owner).name.clone();
                return Err(SceneError::ParentCycle(name));
            }
            cursor = transforms[parent_slot].parent;
        }
    }
    Ok(())
}

// ── Save ─────────────────────────────────────────────────────────────────

/// Mirror of the loader: walk the registry and emit the same schema.
pub fn save_scene(store: &Store) -> SceneFile {
    let mut entities = Vec::with_capacity(store.entities().len());

    for (index, record) in store.entities().iter().enumerate() {
        let id = EntityId(index);
        let tf = store
            .component::<Transform>(id)
            .expect("every entity has a transform");
        let (scale, rotation, translate) = tf.local.to_scale_rotation_translation();
        let (rx, ry, rz) = rotation.to_euler(EulerRot::XYZ);
        let parent = tf.parent.map(|slot| {
            let owner = store.component_in_array::<Transform>(slot).owner;
            store.entity_record(owner).name.clone()
        });

        let collider = store.component::<Collider>(id).map(|c| match c.shape {
            ColliderShape::Box => SceneCollider::Box {
                center: c.local_center,
                halfwidth: c.local_halfwidth,
            },
            ColliderShape::Ray => SceneCollider::Ray {
                direction: c.direction,
                max_distance: c.max_distance,
            },
        });

        entities.push(SceneEntity {
            name: record.name.clone(),
            transform: SceneTransform {
                translate,
                rotate: Vec3::new(rx, ry, rz) * RAD2DEG,
                scale,
                parent,
            },
            mesh: store.component::<Mesh>(id).map(|m| SceneMesh {
                geometry: m.geometry,
                material: m.material,
            }),
            collider,
            light: store.component::<Light>(id).map(|l| SceneLight { color: l.color }),
            tags: store
                .component::<Tag>(id)
                .map(|t| t.tags.clone())
                .unwrap_or_default(),
            rotator: store.component::<Rotator>(id).map(|r| SceneRotator {
                speed: r.speed,
                axis: r.axis,
            }),
            platform: store.component::<MovingPlatform>(id).map(|p| ScenePlatform {
                speed: p.speed,
                dir: p.dir,
                period: p.period,
            }),
            gui_text: store.component::<GuiText>(id).map(|t| SceneGuiText {
                text: t.text.clone(),
                font_face: t.font_face.clone(),
                font_size: t.font_size,
                color: t.color,
                anchor: t.anchor,
                offset: t.offset,
            }),
        });
    }

    SceneFile { entities }
}

/// [`save_scene`] serialized to pretty JSON.
pub fn save_scene_string(store: &Store) -> Result<String, SceneError> {
    Ok(serde_json::to_string_pretty(&save_scene(store))?)
}

/// [`save_scene`] written to a file on disk.
pub fn save_scene_file(store: &Store, path: impl AsRef<Path>) -> Result<(), SceneError> {
    std::fs::write(path, save_scene_string(store)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITEBOX: &str = r#"{
        "entities": [
            { "name": "floor",
              "transform": { "translate": [0, -0.5, 0], "scale": [20, 1, 20] },
              "collider": { "type": "box", "center": [0, 0, 0], "halfwidth": [0.5, 0.5, 0.5] },
              "tags": ["ground", "static"] },
            { "name": "beacon",
              "transform": { "translate": [0, 3, 0], "parent": "floor" },
              "light": { "color": [1, 0.9, 0.7] },
              "rotator": { "speed": 2.0, "axis": [0, 1, 0] } },
            { "name": "probe",
              "transform": { "translate": [0, 2, 5] },
              "collider": { "type": "ray", "direction": [0, 0, -1], "max_distance": 50 } }
        ]
    }"#;

    #[test]
    fn loads_components_from_json() {
        let mut store = Store::new();
        let ids = load_scene(&mut store, WHITEBOX).unwrap();
        assert_eq!(ids.len(), 3);

        let floor = store.entity("floor").unwrap();
        let collider = store.component::<Collider>(floor).unwrap();
        assert_eq!(collider.shape, ColliderShape::Box);
        assert_eq!(collider.local_halfwidth, Vec3::splat(0.5));
        assert!(store.component::<Tag>(floor).unwrap().has_tag("static"));

        let probe = store.entity("probe").unwrap();
        let ray = store.component::<Collider>(probe).unwrap();
        assert_eq!(ray.shape, ColliderShape::Ray);
        assert_eq!(ray.max_distance, 50.0);

        let beacon = store.entity("beacon").unwrap();
        assert!(store.component::<Light>(beacon).is_some());
        assert_eq!(store.component::<Rotator>(beacon).unwrap().speed, 2.0);
    }

    #[test]
    fn parent_links_resolve_to_world_positions() {
        let mut store = Store::new();
        load_scene(&mut store, WHITEBOX).unwrap();

        let beacon = store.entity("beacon").unwrap();
        let transforms = store.all_components::<Transform>();
        let world = store
            .component::<Transform>(beacon)
            .unwrap()
            .world_matrix(transforms);
        // floor at y = -0.5, beacon local +3 → world y = 2.5.
        assert!((world.w_axis.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn scale_defaults_to_one() {
        let mut store = Store::new();
        load_scene(
            &mut store,
            r#"{ "entities": [ { "name": "n", "transform": { "translate": [1, 2, 3] } } ] }"#,
        )
        .unwrap();
        let n = store.entity("n").unwrap();
        let (scale, _, translate) = store
            .component::<Transform>(n)
            .unwrap()
            .local
            .to_scale_rotation_translation();
        assert_eq!(scale, Vec3::ONE);
        assert_eq!(translate, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn unknown_parent_is_an_error() {
        let mut store = Store::new();
        let err = load_scene(
            &mut store,
            r#"{ "entities": [
                { "name": "orphan", "transform": { "translate": [0,0,0], "parent": "nobody" } }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::UnknownParent { .. }));
    }

    #[test]
    fn parent_cycle_is_rejected() {
        let mut store = Store::new();
        let err = load_scene(
            &mut store,
            r#"{ "entities": [
                { "name": "a", "transform": { "translate": [0,0,0], "parent": "b" } },
                { "name": "b", "transform": { "translate": [0,0,0], "parent": "a" } }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::ParentCycle(_)));
    }

    #[test]
    fn save_round_trips_through_load() {
        let mut store = Store::new();
        load_scene(&mut store, WHITEBOX).unwrap();
        let json = save_scene_string(&store).unwrap();

        let mut reloaded = Store::new();
        load_scene(&mut reloaded, &json).unwrap();

        assert_eq!(store.entities().len(), reloaded.entities().len());
        for record in store.entities() {
            let original = store.entity(&record.name).unwrap();
            let copy = reloaded.entity(&record.name).unwrap();

            let a = store.component::<Transform>(original).unwrap();
            let b = reloaded.component::<Transform>(copy).unwrap();
            assert!((a.local.w_axis - b.local.w_axis).length() < 1e-4);
            assert_eq!(a.parent.is_some(), b.parent.is_some());

            match (
                store.component::<Collider>(original),
                reloaded.component::<Collider>(copy),
            ) {
                (Some(ca), Some(cb)) => {
                    assert_eq!(ca.shape, cb.shape);
                    assert_eq!(ca.max_distance, cb.max_distance);
                }
                (None, None) => {}
                _ => panic!("collider presence diverged for \"{}\"", record.name),
            }
        }
    }

    #[test]
    fn malformed_json_reports_cleanly() {
        let mut store = Store::new();
        let err = load_scene(&mut store, "{ not json").unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
        assert!(err.to_string().contains("malformed scene JSON"));
    }
}
