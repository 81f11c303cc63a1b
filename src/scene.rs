use std::path::{Path, PathBuf};
use std::{fs, io};

use glam::{vec3, Vec3};
use thiserror::Error;

use crate::{gpu, Material, Triangle};

/// Flattened triangle-soup scene, the only thing the GPU ever sees of a
/// model.
///
/// Parses the `v` / `f` / `mtllib` / `usemtl` subset of Wavefront OBJ (plus
/// `newmtl` / `Ka` / `Ke` from the material library); normals and texture
/// coordinates are skipped, materials are baked into the triangles and
/// dropped.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    triangles: Vec<Triangle>,
}

impl Scene {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();

        log::info!("Loading scene: {}", path.display());

        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.into(),
            source,
        })?;

        let scene = Self::parse(&text, path)?;

        log::info!("Scene loaded; triangles={}", scene.triangles.len());

        Ok(scene)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, SceneError> {
        let base = path.parent().unwrap_or(Path::new(""));

        let mut pool: Vec<f32> = Vec::new();
        let mut materials: Vec<Material> = Vec::new();
        let mut triangles = Vec::new();

        // Material state carries over between faces; an unresolved `usemtl`
        // keeps it as-is, zero being the initial default
        let mut cur_color = Vec3::ZERO;
        let mut cur_intensity = Vec3::ZERO;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let tokens: Vec<_> = line.split_whitespace().collect();

            let Some((&record, args)) = tokens.split_first() else {
                continue;
            };

            match record {
                "v" => {
                    let [x, y, z] = parse_floats(args, path, line_no)?;

                    pool.extend([x, y, z]);
                }

                "f" => {
                    let corners = parse_face(args, &pool, path, line_no)?;

                    triangles.push(
                        Triangle::new([corners[0], corners[1], corners[2]])
                            .with_color(cur_color)
                            .with_intensity(cur_intensity),
                    );

                    // Quads split along the 0-2 diagonal
                    if let Some(d) = corners.get(3) {
                        triangles.push(
                            Triangle::new([corners[0], corners[2], *d])
                                .with_color(cur_color)
                                .with_intensity(cur_intensity),
                        );
                    }
                }

                "mtllib" => {
                    let [name] = args else {
                        return Err(SceneError::MalformedRecord {
                            path: path.into(),
                            line: line_no,
                        });
                    };

                    materials.extend(load_materials(&base.join(*name))?);
                }

                "usemtl" => {
                    let [name] = args else {
                        return Err(SceneError::MalformedRecord {
                            path: path.into(),
                            line: line_no,
                        });
                    };

                    match materials.iter().find(|mat| mat.name() == *name) {
                        Some(mat) => {
                            cur_color = mat.color();
                            cur_intensity = mat.intensity();
                        }
                        None => {
                            log::warn!(
                                "Unknown material `{name}` at {}:{line_no} - \
                                 keeping previous values",
                                path.display(),
                            );
                        }
                    }
                }

                _ => (),
            }
        }

        Ok(Self { triangles })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub(crate) fn serialize(&self) -> Vec<gpu::Triangle> {
        self.triangles.iter().map(Triangle::serialize).collect()
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("couldn't read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed number `{token}` at {path}:{line}")]
    MalformedNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("malformed record at {path}:{line}")]
    MalformedRecord { path: PathBuf, line: usize },

    #[error("face index out of bounds at {path}:{line}")]
    FaceIndex { path: PathBuf, line: usize },
}

fn parse_floats<const N: usize>(
    args: &[&str],
    path: &Path,
    line: usize,
) -> Result<[f32; N], SceneError> {
    if args.len() < N {
        return Err(SceneError::MalformedRecord {
            path: path.into(),
            line,
        });
    }

    let mut out = [0.0; N];

    for (slot, token) in out.iter_mut().zip(args) {
        *slot = token.parse().map_err(|_| SceneError::MalformedNumber {
            path: path.into(),
            line,
            token: token.to_string(),
        })?;
    }

    Ok(out)
}

fn parse_face(
    args: &[&str],
    pool: &[f32],
    path: &Path,
    line: usize,
) -> Result<Vec<Vec3>, SceneError> {
    if args.len() < 3 || args.len() > 4 {
        return Err(SceneError::MalformedRecord {
            path: path.into(),
            line,
        });
    }

    args.iter()
        .map(|&token| {
            // `i/j/k` forms: only the vertex index before the first slash
            let token = token.split('/').next().unwrap_or(token);

            let index: i32 =
                token.parse().map_err(|_| SceneError::MalformedNumber {
                    path: path.into(),
                    line,
                    token: token.to_string(),
                })?;

            let offset = resolve_index(index, pool.len()).ok_or_else(|| {
                SceneError::FaceIndex {
                    path: path.into(),
                    line,
                }
            })?;

            Ok(vec3(pool[offset], pool[offset + 1], pool[offset + 2]))
        })
        .collect()
}

/// Resolves a 1-based (or negative, relative-to-end) face index into an
/// offset into the flat vertex pool.
///
/// Negative indices reference the most recently defined vertices:
/// `offset = pool_len + 3 * index`, so `-1` with a pool of 30 floats lands on
/// the 10th vertex's start offset, 27.
fn resolve_index(index: i32, pool_len: usize) -> Option<usize> {
    let offset = if index < 0 {
        pool_len as isize + 3 * index as isize
    } else if index >= 1 {
        (index as isize - 1) * 3
    } else {
        return None;
    };

    if offset >= 0 && (offset + 3) as usize <= pool_len {
        Some(offset as usize)
    } else {
        None
    }
}

fn load_materials(path: &Path) -> Result<Vec<Material>, SceneError> {
    log::info!("Loading material library: {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.into(),
        source,
    })?;

    let mut materials: Vec<Material> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<_> = line.split_whitespace().collect();

        let Some((&record, args)) = tokens.split_first() else {
            continue;
        };

        match record {
            "newmtl" => {
                let [name] = args else {
                    return Err(SceneError::MalformedRecord {
                        path: path.into(),
                        line: line_no,
                    });
                };

                materials.push(Material::new(name));
            }

            "Ka" | "Ke" => {
                let [r, g, b] = parse_floats(args, path, line_no)?;

                let Some(material) = materials.last_mut() else {
                    log::warn!(
                        "`{record}` before any `newmtl` at {}:{line_no} - \
                         skipping",
                        path.display(),
                    );
                    continue;
                };

                if record == "Ka" {
                    material.set_color(vec3(r, g, b));
                } else {
                    material.set_intensity(vec3(r, g, b));
                }
            }

            _ => (),
        }
    }

    Ok(materials)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scene_from(obj: &str) -> Scene {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.obj");

        fs::write(&path, obj).unwrap();

        Scene::load(&path).unwrap()
    }

    #[test]
    fn single_triangle_without_materials() {
        let scene = scene_from(
            "v 130 130 200\n\
             v 30 130 200\n\
             v 30 30 200\n\
             f 1 2 3\n",
        );

        assert_eq!(1, scene.triangles().len());

        let tri = &scene.triangles()[0];

        assert_eq!(
            [
                vec3(130.0, 130.0, 200.0),
                vec3(30.0, 130.0, 200.0),
                vec3(30.0, 30.0, 200.0),
            ],
            tri.positions(),
        );

        assert_eq!(Vec3::ZERO, tri.color());
        assert_eq!(Vec3::ZERO, tri.intensity());
    }

    #[test]
    fn quad_splits_along_diagonal() {
        let scene = scene_from(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             f 1 2 3 4\n",
        );

        assert_eq!(2, scene.triangles().len());

        let [a, b] = [&scene.triangles()[0], &scene.triangles()[1]];

        assert_eq!(
            [vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0)],
            a.positions(),
        );

        // Second triangle shares the quad's 0th and 2nd corner
        assert_eq!(
            [vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0), vec3(0.0, 1.0, 0.0)],
            b.positions(),
        );
    }

    #[test]
    fn negative_indices_reference_recent_vertices() {
        let mut obj = String::new();

        for i in 0..10 {
            obj.push_str(&format!("v {i} {i} {i}\n"));
        }

        obj.push_str("f -3 -2 -1\n");

        let scene = scene_from(&obj);

        assert_eq!(
            [vec3(7.0, 7.0, 7.0), vec3(8.0, 8.0, 8.0), vec3(9.0, 9.0, 9.0)],
            scene.triangles()[0].positions(),
        );
    }

    #[test]
    fn negative_index_formula() {
        // Pool of 10 vertices = 30 floats; -1 must land on the 10th vertex's
        // start offset
        assert_eq!(Some(27), resolve_index(-1, 30));
        assert_eq!(Some(0), resolve_index(-10, 30));
        assert_eq!(None, resolve_index(-11, 30));
        assert_eq!(Some(0), resolve_index(1, 30));
        assert_eq!(Some(27), resolve_index(10, 30));
        assert_eq!(None, resolve_index(11, 30));
        assert_eq!(None, resolve_index(0, 30));
    }

    #[test]
    fn slash_forms_take_the_vertex_index() {
        let scene = scene_from(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             f 1/4 2/5/6 3//7\n",
        );

        assert_eq!(1, scene.triangles().len());
    }

    #[test]
    fn materials_resolve_by_name() {
        let dir = tempfile::tempdir().unwrap();

        fs::write(
            dir.path().join("scene.mtl"),
            "newmtl light\n\
             Ka 0.5 0.5 0.5\n\
             Ke 10 10 10\n\
             newmtl wall\n\
             Ka 0.75 0.25 0.25\n",
        )
        .unwrap();

        let path = dir.path().join("scene.obj");

        fs::write(
            &path,
            "mtllib scene.mtl\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             usemtl light\n\
             f 1 2 3\n\
             usemtl wall\n\
             f 1 2 3\n",
        )
        .unwrap();

        let scene = Scene::load(&path).unwrap();

        assert_eq!(vec3(0.5, 0.5, 0.5), scene.triangles()[0].color());
        assert_eq!(vec3(10.0, 10.0, 10.0), scene.triangles()[0].intensity());
        assert_eq!(vec3(0.75, 0.25, 0.25), scene.triangles()[1].color());
        assert_eq!(Vec3::ZERO, scene.triangles()[1].intensity());
    }

    #[test]
    fn unknown_material_keeps_previous_values() {
        let dir = tempfile::tempdir().unwrap();

        fs::write(
            dir.path().join("scene.mtl"),
            "newmtl wall\nKa 1 0 0\n",
        )
        .unwrap();

        let path = dir.path().join("scene.obj");

        fs::write(
            &path,
            "mtllib scene.mtl\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             usemtl wall\n\
             usemtl nope\n\
             f 1 2 3\n",
        )
        .unwrap();

        let scene = Scene::load(&path).unwrap();

        assert_eq!(vec3(1.0, 0.0, 0.0), scene.triangles()[0].color());
    }

    #[test]
    fn malformed_number_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.obj");

        fs::write(&path, "v 0 zero 0\n").unwrap();

        let err = Scene::load(&path).unwrap_err();

        assert!(matches!(
            err,
            SceneError::MalformedNumber { line: 1, .. }
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();

        let err = Scene::load(dir.path().join("nope.obj")).unwrap_err();

        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn out_of_bounds_face_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.obj");

        fs::write(&path, "v 0 0 0\nf 1 2 3\n").unwrap();

        let err = Scene::load(&path).unwrap_err();

        assert!(matches!(err, SceneError::FaceIndex { line: 2, .. }));
    }
}
