//! glTF head import: CPU-side geometry for morph blending plus the channel
//! registry the compositor drives.

use avatar_core::{MorphTarget, MorphTargetRegistry};
use glam::{Mat3, Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(serde::Deserialize, Default)]
struct MeshExtras {
    #[serde(rename = "targetNames", default)]
    target_names: Vec<String>,
}

/// One drawable primitive. Deltas are per morph target, in world space.
pub struct MeshPart {
    pub base_positions: Vec<Vec3>,
    pub base_normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub position_deltas: Vec<Vec<Vec3>>,
    pub normal_deltas: Vec<Vec<Vec3>>,
    /// Registry slot holding this part's influences; `None` when static.
    pub target: Option<usize>,
}

impl MeshPart {
    /// Blend the base shape towards every target with a non-zero influence.
    pub fn blend_into(&self, influences: &[f32], out: &mut Vec<Vertex>) {
        out.clear();
        out.extend(
            self.base_positions
                .iter()
                .zip(&self.base_normals)
                .map(|(p, n)| Vertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                }),
        );
        for (t, &w) in influences.iter().enumerate() {
            if w == 0.0 {
                continue;
            }
            if let Some(deltas) = self.position_deltas.get(t) {
                for (v, d) in out.iter_mut().zip(deltas) {
                    v.position = (Vec3::from(v.position) + *d * w).to_array();
                }
            }
            if let Some(deltas) = self.normal_deltas.get(t) {
                for (v, d) in out.iter_mut().zip(deltas) {
                    v.normal = (Vec3::from(v.normal) + *d * w).to_array();
                }
            }
        }
        for v in out.iter_mut() {
            v.normal = Vec3::from(v.normal).normalize_or_zero().to_array();
        }
    }
}

pub struct LoadedAvatar {
    pub parts: Vec<MeshPart>,
    pub registry: MorphTargetRegistry,
}

/// Parse a binary glTF. Every primitive with morph targets gets its own
/// registry entry, named from the mesh's `extras.targetNames`.
pub fn load_glb(bytes: &[u8]) -> anyhow::Result<LoadedAvatar> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| anyhow::anyhow!("glTF has no scene"))?;

    let mut avatar = LoadedAvatar {
        parts: Vec::new(),
        registry: MorphTargetRegistry::new(),
    };
    let mut stack: Vec<(gltf::Node, Mat4)> =
        scene.nodes().map(|n| (n, Mat4::IDENTITY)).collect();
    while let Some((node, parent)) = stack.pop() {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        if let Some(mesh) = node.mesh() {
            load_mesh(&mesh, &buffers, world, &mut avatar)?;
        }
        stack.extend(node.children().map(|c| (c, world)));
    }

    log::info!(
        "loaded avatar: {} parts, {} morph targets",
        avatar.parts.len(),
        avatar.registry.len()
    );
    Ok(avatar)
}

fn target_names(mesh: &gltf::Mesh) -> Vec<String> {
    mesh.extras()
        .as_ref()
        .and_then(|raw| serde_json::from_str::<MeshExtras>(raw.get()).ok())
        .unwrap_or_default()
        .target_names
}

fn load_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    world: Mat4,
    avatar: &mut LoadedAvatar,
) -> anyhow::Result<()> {
    let label = mesh.name().unwrap_or("mesh").to_string();
    let names = target_names(mesh);
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let base_positions: Vec<Vec3> = positions
            .map(|p| world.transform_point3(Vec3::from(p)))
            .collect();
        let base_normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals
                .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                .collect(),
            None => vec![Vec3::Z; base_positions.len()],
        };
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..base_positions.len() as u32).collect(),
        };

        let mut position_deltas: Vec<Vec<Vec3>> = Vec::new();
        let mut normal_deltas: Vec<Vec<Vec3>> = Vec::new();
        for (positions, normals, _tangents) in reader.read_morph_targets() {
            position_deltas.push(
                positions
                    .map(|it| it.map(|d| world.transform_vector3(Vec3::from(d))).collect::<Vec<_>>())
                    .unwrap_or_default(),
            );
            normal_deltas.push(
                normals
                    .map(|it| it.map(|d| normal_matrix * Vec3::from(d)).collect::<Vec<_>>())
                    .unwrap_or_default(),
            );
        }

        let target = if position_deltas.is_empty() {
            None
        } else {
            if names.len() != position_deltas.len() {
                log::warn!(
                    "{label}: {} target names for {} morph targets",
                    names.len(),
                    position_deltas.len()
                );
            }
            let channel_names = (0..position_deltas.len())
                .map(|i| names.get(i).cloned().unwrap_or_else(|| format!("target_{i}")));
            Some(
                avatar
                    .registry
                    .register(MorphTarget::new(label.clone(), channel_names)),
            )
        };

        avatar.parts.push(MeshPart {
            base_positions,
            base_normals,
            indices,
            position_deltas,
            normal_deltas,
            target,
        });
    }
    Ok(())
}
