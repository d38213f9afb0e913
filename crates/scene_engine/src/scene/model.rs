//! External model loading (OBJ + MTL)
//!
//! The material library is fetched and parsed first, then the mesh file.
//! Both fetches go through the same [`AssetSource`] as scene descriptions.
//! The finished [`ModelAsset`] is plain data; [`create_model`] turns it into
//! a group of mesh nodes.

use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use thiserror::Error;

use crate::assets::{AssetError, AssetSource, MtlData, MtlError, MtlParser, ObjError, ObjLoader, ObjModel};
use crate::render::{Geometry, GeometryGroup, GpuResources, Material, MaterialKey, PhongMaterial};
use crate::scene::{MaterialSlot, MeshNode, ModelSpec, Node, NodeId, SceneGraph};

/// External model load errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// A model file could not be fetched
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        /// Asset path
        path: String,
        /// Fetch failure
        #[source]
        source: AssetError,
    },

    /// The OBJ file is malformed
    #[error("failed to parse {path}: {source}")]
    Obj {
        /// Asset path
        path: String,
        /// Parse failure
        #[source]
        source: ObjError,
    },

    /// The MTL file is malformed
    #[error("failed to parse {path}: {source}")]
    Mtl {
        /// Asset path
        path: String,
        /// Parse failure
        #[source]
        source: MtlError,
    },
}

/// Parsed model files, ready to instantiate
#[derive(Debug, Clone)]
pub struct ModelAsset {
    /// Mesh path the model was loaded from
    pub path: String,
    /// Material library by name
    pub materials: HashMap<String, MtlData>,
    /// Parsed mesh objects
    pub obj: ObjModel,
}

/// In-flight external model load
pub type ModelLoad = LocalBoxFuture<'static, Result<ModelAsset, ModelError>>;

/// Load the material library, then the mesh, for one model object
pub fn load_model(assets: Rc<dyn AssetSource>, spec: &ModelSpec) -> ModelLoad {
    let material_path = spec.material.clone();
    let mesh_path = spec.mesh.clone();
    let material_fetch = assets.fetch_text(&material_path);

    async move {
        let mtl_text = material_fetch
            .await
            .map_err(|source| ModelError::Fetch { path: material_path.clone(), source })?;
        let materials = MtlParser::parse(&mtl_text)
            .map_err(|source| ModelError::Mtl { path: material_path, source })?;

        let obj_text = assets
            .fetch_text(&mesh_path)
            .await
            .map_err(|source| ModelError::Fetch { path: mesh_path.clone(), source })?;
        let obj = ObjLoader::parse(&obj_text)
            .map_err(|source| ModelError::Obj { path: mesh_path.clone(), source })?;

        Ok(ModelAsset { path: mesh_path, materials, obj })
    }
    .boxed_local()
}

/// Build a detached group with one mesh child per OBJ object
///
/// Materials are created once per name and shared by every mesh of the
/// model that uses them. An object that switches material mid-way becomes a
/// multi-material mesh whose geometry carries the index ranges.
pub fn create_model(graph: &mut SceneGraph, resources: &mut GpuResources, asset: &ModelAsset) -> NodeId {
    let group = graph.insert(Node::group());
    let mut material_keys: HashMap<Option<&str>, MaterialKey> = HashMap::new();

    for object in &asset.obj.objects {
        let mut keys = Vec::with_capacity(object.groups.len());
        let mut groups = Vec::with_capacity(object.groups.len());

        for (index, range) in object.groups.iter().enumerate() {
            let name = range.material.as_deref();
            let key = *material_keys
                .entry(name)
                .or_insert_with(|| resources.create_material(phong_material(name, &asset.materials)));
            keys.push(key);
            groups.push(GeometryGroup { start: range.start, count: range.count, material_index: index });
        }

        let materials = match keys.len() {
            0 => MaterialSlot::Single(
                *material_keys
                    .entry(None)
                    .or_insert_with(|| resources.create_material(phong_material(None, &asset.materials))),
            ),
            1 => {
                groups.clear();
                MaterialSlot::Single(keys[0])
            }
            _ => MaterialSlot::Multi(keys),
        };

        let geometry = resources.create_geometry(Geometry::Mesh { data: object.mesh.clone(), groups });
        graph.add(
            group,
            Node::mesh(MeshNode { geometry: Some(geometry), materials }).with_name(object.name.as_str()),
        );
    }

    group
}

fn phong_material(name: Option<&str>, library: &HashMap<String, MtlData>) -> Material {
    let Some(name) = name else {
        return Material::Phong(PhongMaterial::default());
    };
    let Some(data) = library.get(name) else {
        log::warn!("Material '{}' not found in library, using default", name);
        return Material::Phong(PhongMaterial { name: name.to_string(), ..PhongMaterial::default() });
    };

    Material::Phong(PhongMaterial {
        name: data.name.clone(),
        color: data.diffuse,
        specular: data.specular,
        emissive: data.emission,
        shininess: data.specular_exponent,
        opacity: data.dissolve,
        transparent: data.dissolve < 1.0,
        diffuse_map: data.diffuse_map.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualAssetSource;
    use futures::executor::block_on;

    const MTL: &str = "newmtl Sclera\nKd 1 1 1\nnewmtl Pupil\nKd 0 0 0\nd 0.5\n";
    const OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
o Eye\nusemtl Sclera\nf 1 2 3\nusemtl Pupil\nf 1 3 2\n\
o Lid\nusemtl Sclera\nf 1 2 3\n\
o Brow\nusemtl Missing\nf 1 2 3\n";

    fn spec() -> ModelSpec {
        ModelSpec {
            material: "models/eye.mtl".to_string(),
            mesh: "models/eye.obj".to_string(),
            placement: Default::default(),
        }
    }

    #[test]
    fn test_load_fetches_material_before_mesh() {
        let source = ManualAssetSource::new();
        source.serve("models/eye.mtl", MTL);
        source.serve("models/eye.obj", OBJ);

        let asset = block_on(load_model(Rc::new(source.clone()), &spec())).unwrap();
        assert_eq!(asset.materials.len(), 2);
        assert_eq!(asset.obj.objects.len(), 3);
        assert_eq!(source.fetch_order(), vec!["models/eye.mtl".to_string(), "models/eye.obj".to_string()]);
    }

    #[test]
    fn test_missing_material_file_skips_mesh_fetch() {
        let source = ManualAssetSource::new();
        source.serve_error("models/eye.mtl");

        let result = block_on(load_model(Rc::new(source.clone()), &spec()));
        assert!(matches!(result, Err(ModelError::Fetch { ref path, .. }) if path == "models/eye.mtl"));
        assert_eq!(source.fetch_count("models/eye.obj"), 0);
    }

    #[test]
    fn test_bad_obj_is_reported() {
        let source = ManualAssetSource::new();
        source.serve("models/eye.mtl", MTL);
        source.serve("models/eye.obj", "v 0 0 0\n");

        let result = block_on(load_model(Rc::new(source), &spec()));
        assert!(matches!(result, Err(ModelError::Obj { .. })));
    }

    #[test]
    fn test_create_model_shares_materials() {
        let asset = ModelAsset {
            path: "models/eye.obj".to_string(),
            materials: MtlParser::parse(MTL).unwrap(),
            obj: ObjLoader::parse(OBJ).unwrap(),
        };
        let mut graph = SceneGraph::new();
        let mut resources = GpuResources::new();

        let group = create_model(&mut graph, &mut resources, &asset);
        assert!(graph.parent(group).is_none());

        let children = graph.children(group).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(resources.live_geometry_count(), 3);
        // Sclera, Pupil, and a fallback for Missing
        assert_eq!(resources.live_material_count(), 3);

        let eye = graph.get(children[0]).unwrap().as_mesh().unwrap();
        let MaterialSlot::Multi(eye_materials) = &eye.materials else {
            panic!("expected multi-material eye");
        };
        let lid = graph.get(children[1]).unwrap().as_mesh().unwrap();
        assert_eq!(lid.materials, MaterialSlot::Single(eye_materials[0]));

        let Some(Geometry::Mesh { groups, .. }) = eye.geometry.and_then(|k| resources.geometry(k)) else {
            panic!("expected mesh geometry");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].material_index, 1);

        let pupil = resources.material(eye_materials[1]).unwrap();
        let Material::Phong(pupil) = pupil else { panic!("expected phong") };
        assert!(pupil.transparent);
        assert_eq!(graph.get(children[2]).unwrap().name, "Brow");
    }
}
