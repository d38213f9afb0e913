//! OBJ file loader for external models
//!
//! Each `o`/`g` block becomes one [`ObjObject`]. A `usemtl` switch inside a
//! block opens a new index range, so one object may reference several
//! materials.

use thiserror::Error;

use crate::render::{MeshData, Vertex};

/// OBJ parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjError {
    /// A statement could not be parsed
    #[error("OBJ line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// The file parsed but holds nothing usable
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Index range of one object drawn with one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjGroup {
    /// Material named by the active `usemtl`, if any
    pub material: Option<String>,
    /// First index in the object's index buffer
    pub start: u32,
    /// Number of indices
    pub count: u32,
}

/// A named block of faces
#[derive(Debug, Clone)]
pub struct ObjObject {
    /// Object or group name (may be empty)
    pub name: String,
    /// Triangulated geometry
    pub mesh: MeshData,
    /// Material ranges, in file order
    pub groups: Vec<ObjGroup>,
}

impl ObjObject {
    fn named(name: String) -> Self {
        Self { name, mesh: MeshData::default(), groups: Vec::new() }
    }

    fn has_faces(&self) -> bool {
        !self.mesh.indices.is_empty()
    }

    fn begin_group(&mut self, material: Option<String>) {
        let start = self.mesh.indices.len() as u32;
        match self.groups.last_mut() {
            Some(last) if last.count == 0 => last.material = material,
            _ => self.groups.push(ObjGroup { material, start, count: 0 }),
        }
    }

    fn close_group(&mut self) {
        let end = self.mesh.indices.len() as u32;
        if let Some(last) = self.groups.last_mut() {
            last.count = end - last.start;
        }
    }

    fn finish(mut self) -> Self {
        self.groups.retain(|group| group.count > 0);
        self
    }
}

/// Parsed OBJ file
#[derive(Debug, Clone)]
pub struct ObjModel {
    /// Objects with at least one face
    pub objects: Vec<ObjObject>,
    /// `mtllib` references, informational only
    pub material_libraries: Vec<String>,
}

/// OBJ text parser
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ text into objects
    pub fn parse(contents: &str) -> Result<ObjModel, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut objects = Vec::new();
        let mut material_libraries = Vec::new();
        let mut current = ObjObject::named(String::new());
        let mut current_material: Option<String> = None;
        
        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            
            let parts: Vec<&str> = line.split_whitespace().collect();
            let rest = || parts[1..].join(" ");
            
            match parts[0] {
                "v" => {
                    let [x, y, z] = Self::parse_floats::<3>(&parts, line_num, "vertex")?;
                    positions.push([x, y, z]);
                }
                "vn" => {
                    let [x, y, z] = Self::parse_floats::<3>(&parts, line_num, "normal")?;
                    normals.push([x, y, z]);
                }
                "vt" => {
                    let [u, v] = Self::parse_floats::<2>(&parts, line_num, "tex coord")?;
                    tex_coords.push([u, v]);
                }
                "o" | "g" => {
                    if current.has_faces() {
                        current.close_group();
                        objects.push(std::mem::replace(&mut current, ObjObject::named(rest())).finish());
                    } else {
                        current.name = rest();
                        current.groups.clear();
                    }
                }
                "usemtl" => {
                    current.close_group();
                    current_material = Some(rest());
                    current.begin_group(current_material.clone());
                }
                "mtllib" => material_libraries.push(rest()),
                "f" => {
                    if parts.len() < 4 {
                        return Err(Self::parse_error(line_num, "face needs at least 3 vertices"));
                    }
                    if current.groups.is_empty() {
                        current.begin_group(current_material.clone());
                    }

                    let mut face_indices = Vec::with_capacity(parts.len() - 1);
                    for vertex_data in &parts[1..] {
                        let vertex = Self::parse_face_vertex(
                            vertex_data, line_num, &positions, &normals, &tex_coords,
                        )?;
                        current.mesh.vertices.push(vertex);
                        face_indices.push((current.mesh.vertices.len() - 1) as u32);
                    }
                    
                    // Fan triangulation
                    for i in 1..(face_indices.len() - 1) {
                        current.mesh.indices.extend_from_slice(&[
                            face_indices[0],
                            face_indices[i],
                            face_indices[i + 1],
                        ]);
                    }
                    current.close_group();
                }
                _ => {}
            }
        }

        if current.has_faces() {
            current.close_group();
            objects.push(current.finish());
        }
        
        if objects.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }
        
        Ok(ObjModel { objects, material_libraries })
    }

    fn parse_floats<const N: usize>(parts: &[&str], line_num: usize, what: &str) -> Result<[f32; N], ObjError> {
        if parts.len() < N + 1 {
            return Err(Self::parse_error(line_num, format!("{what} needs {N} components")));
        }
        let mut values = [0.0; N];
        for (value, token) in values.iter_mut().zip(&parts[1..=N]) {
            *value = token
                .parse()
                .map_err(|_| Self::parse_error(line_num, format!("invalid {what} component '{token}'")))?;
        }
        Ok(values)
    }

    /// Parse one `v`, `v/vt`, `v//vn` or `v/vt/vn` reference
    fn parse_face_vertex(
        vertex_data: &str,
        line_num: usize,
        positions: &[[f32; 3]],
        normals: &[[f32; 3]],
        tex_coords: &[[f32; 2]],
    ) -> Result<Vertex, ObjError> {
        let mut refs = vertex_data.split('/');

        let position = refs
            .next()
            .and_then(|raw| Self::resolve_index(raw, positions.len()))
            .and_then(|idx| positions.get(idx))
            .ok_or_else(|| Self::parse_error(line_num, format!("bad position reference '{vertex_data}'")))?;

        let tex_coord = refs
            .next()
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| Self::resolve_index(raw, tex_coords.len()))
            .and_then(|idx| tex_coords.get(idx))
            .copied()
            .unwrap_or([0.0, 0.0]);

        let normal = refs
            .next()
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| Self::resolve_index(raw, normals.len()))
            .and_then(|idx| normals.get(idx))
            .copied()
            .unwrap_or([0.0, 1.0, 0.0]);

        Ok(Vertex { position: *position, normal, tex_coord })
    }

    /// OBJ indices are 1-based; negative values count back from the end
    fn resolve_index(raw: &str, len: usize) -> Option<usize> {
        let index: i64 = raw.parse().ok()?;
        match index {
            0 => None,
            i if i > 0 => usize::try_from(i - 1).ok(),
            i => len.checked_sub(usize::try_from(-i).ok()?),
        }
    }

    fn parse_error(line_num: usize, message: impl Into<String>) -> ObjError {
        ObjError::Parse { line: line_num + 1, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = r#"
mtllib quad.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
o Quad
usemtl White
f 1//1 2//1 3//1 4//1
"#;

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = ObjLoader::parse(QUAD).unwrap();
        assert_eq!(model.material_libraries, vec!["quad.mtl".to_string()]);
        assert_eq!(model.objects.len(), 1);

        let quad = &model.objects[0];
        assert_eq!(quad.name, "Quad");
        assert_eq!(quad.mesh.vertices.len(), 4);
        assert_eq!(quad.mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(quad.mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(
            quad.groups,
            vec![ObjGroup { material: Some("White".to_string()), start: 0, count: 6 }]
        );
    }

    #[test]
    fn test_material_switch_splits_groups() {
        let obj = r#"
v 0 0 0
v 1 0 0
v 0 1 0
o Eye
usemtl Sclera
f 1 2 3
usemtl Pupil
f -3 -2 -1
"#;
        let model = ObjLoader::parse(obj).unwrap();
        let eye = &model.objects[0];
        assert_eq!(eye.groups.len(), 2);
        assert_eq!(eye.groups[0].material.as_deref(), Some("Sclera"));
        assert_eq!(eye.groups[1].material.as_deref(), Some("Pupil"));
        assert_eq!(eye.groups[1].start, 3);
        assert_eq!(eye.groups[1].count, 3);
    }

    #[test]
    fn test_objects_split_on_o_statements() {
        let obj = r#"
v 0 0 0
v 1 0 0
v 0 1 0
o Left
f 1 2 3
o Right
f 1 3 2
"#;
        let model = ObjLoader::parse(obj).unwrap();
        let names: Vec<&str> = model.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Left", "Right"]);
        assert!(model.objects[1].groups[0].material.is_none());
    }

    #[test]
    fn test_out_of_range_reference_fails() {
        let result = ObjLoader::parse("v 0 0 0\nf 1 2 3\n");
        assert!(matches!(result, Err(ObjError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_file_without_faces_is_invalid() {
        let result = ObjLoader::parse("v 0 0 0\n");
        assert!(matches!(result, Err(ObjError::InvalidFormat(_))));
    }
}
