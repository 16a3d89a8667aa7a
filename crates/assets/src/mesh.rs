//! Mesh bounds from glTF and GLB containers.
//!
//! glTF requires `min`/`max` on every `POSITION` accessor, so a mesh's local
//! bounds come from the document alone without touching vertex buffers.
//! Node transforms of the default scene are applied, so a model authored
//! with a root scale or offset yields the box it is actually drawn with.

use glam::{Mat4, Vec3};
use gltf::mesh::Semantic;
use gltf::{Gltf, Mesh, Node};
use labyrinth_common::Aabb;

use crate::AssetError;

/// Deepest node hierarchy walked before the document is rejected.
const MAX_NODE_DEPTH: usize = 64;

/// Bounds of a `.gltf` or `.glb` payload in model space.
///
/// Walks the default scene (or the first scene) and unions every mesh
/// primitive's `POSITION` box under its node's world matrix. A document
/// whose scenes place no mesh falls back to the raw union of all meshes.
pub fn mesh_bounds_from_slice(bytes: &[u8], path: &str) -> Result<Aabb, AssetError> {
    let gltf = Gltf::from_slice(bytes).map_err(|err| failure(path, err.to_string()))?;

    let mut placed = None;
    if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
        for node in scene.nodes() {
            visit(&node, Mat4::IDENTITY, 0, &mut placed, path)?;
        }
    }
    if let Some(bounds) = placed {
        return Ok(bounds);
    }

    let mut local = None;
    for mesh in gltf.meshes() {
        if let Some(b) = mesh_local_bounds(&mesh, path)? {
            merge(&mut local, b);
        }
    }
    local.ok_or_else(|| failure(path, "no mesh primitive has POSITION bounds"))
}

fn visit(
    node: &Node<'_>,
    parent: Mat4,
    depth: usize,
    acc: &mut Option<Aabb>,
    path: &str,
) -> Result<(), AssetError> {
    if depth >= MAX_NODE_DEPTH {
        return Err(failure(path, format!("node hierarchy deeper than {MAX_NODE_DEPTH}")));
    }
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        if let Some(local) = mesh_local_bounds(&mesh, path)? {
            merge(acc, transform_box(&local, &world));
        }
    }
    for child in node.children() {
        visit(&child, world, depth + 1, acc, path)?;
    }
    Ok(())
}

fn mesh_local_bounds(mesh: &Mesh<'_>, path: &str) -> Result<Option<Aabb>, AssetError> {
    let mut bounds = None;
    for primitive in mesh.primitives() {
        let Some(accessor) = primitive.get(&Semantic::Positions) else {
            continue;
        };
        let index = accessor.index();
        let min = accessor
            .min()
            .and_then(|v| vec3(&v))
            .ok_or_else(|| failure(path, format!("accessor {index} has no usable min")))?;
        let max = accessor
            .max()
            .and_then(|v| vec3(&v))
            .ok_or_else(|| failure(path, format!("accessor {index} has no usable max")))?;
        merge(&mut bounds, Aabb::new(min, max));
    }
    Ok(bounds)
}

fn vec3(value: &gltf::json::Value) -> Option<Vec3> {
    let arr = value.as_array()?;
    if arr.len() < 3 {
        return None;
    }
    let c = |i: usize| arr[i].as_f64().map(|v| v as f32);
    let v = Vec3::new(c(0)?, c(1)?, c(2)?);
    v.is_finite().then_some(v)
}

fn transform_box(local: &Aabb, m: &Mat4) -> Aabb {
    let (lo, hi) = (local.min, local.max);
    let mut out: Option<Aabb> = None;
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { lo.x } else { hi.x },
            if i & 2 == 0 { lo.y } else { hi.y },
            if i & 4 == 0 { lo.z } else { hi.z },
        );
        let p = m.transform_point3(corner);
        merge(&mut out, Aabb::new(p, p));
    }
    out.unwrap_or(*local)
}

fn merge(acc: &mut Option<Aabb>, b: Aabb) {
    *acc = Some(match acc.take() {
        Some(a) => a.union(&b),
        None => b,
    });
}

fn failure(path: &str, reason: impl Into<String>) -> AssetError {
    AssetError::LoadFailure {
        path: path.to_string(),
        reason: reason.into(),
    }
}
