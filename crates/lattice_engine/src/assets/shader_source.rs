//! Shader source loading
//!
//! Reads GLSL stage files and scans them for sampler uniform
//! declarations. The scan feeds the shader element its bindable uniform
//! table; actual compilation happens in the graphics backend.

use super::{read_bytes, AssetError};
use crate::elements::shader::SamplerKind;
use std::path::Path;

/// Sampler table scanned from a shader program's stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    /// Sampler uniforms in declaration order, deduplicated by name
    pub samplers: Vec<(String, SamplerKind)>,
    /// Whether a geometry stage was part of the program
    pub has_geometry_stage: bool,
}

/// Load a vertex/fragment program with an optional geometry stage.
pub fn load_shader_program(
    vertex: &Path,
    fragment: &Path,
    geometry: Option<&Path>,
) -> Result<ShaderSources, AssetError> {
    let mut samplers = Vec::new();
    scan_stage(vertex, &mut samplers)?;
    scan_stage(fragment, &mut samplers)?;
    if let Some(geometry) = geometry {
        scan_stage(geometry, &mut samplers)?;
    }
    Ok(ShaderSources {
        samplers,
        has_geometry_stage: geometry.is_some(),
    })
}

fn scan_stage(path: &Path, samplers: &mut Vec<(String, SamplerKind)>) -> Result<(), AssetError> {
    let bytes = read_bytes(path)?;
    let source = std::str::from_utf8(&bytes).map_err(|_| {
        AssetError::InvalidData(format!("{}: shader source is not UTF-8", path.display()))
    })?;
    if !source.contains("main") {
        return Err(AssetError::InvalidData(format!(
            "{}: stage has no entry point",
            path.display()
        )));
    }
    for line in source.lines() {
        let line = line.split("//").next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("uniform") {
            continue;
        }
        let kind = match tokens.next() {
            Some("sampler2D") => SamplerKind::Flat,
            Some("samplerCube") => SamplerKind::Cube,
            _ => continue,
        };
        let Some(name) = tokens.next() else {
            continue;
        };
        let name = name.trim_end_matches(';');
        if name.is_empty() {
            continue;
        }
        if !samplers.iter().any(|(existing, _)| existing == name) {
            samplers.push((name.to_owned(), kind));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stage(name: &str, source: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lattice-shader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn samplers_are_scanned_across_stages() {
        let vertex = stage("basic.vert", "void main() { gl_Position = vec4(0.0); }\n");
        let fragment = stage(
            "basic.frag",
            "uniform sampler2D gColorMap;\n\
             uniform samplerCube gSkyMap;\n\
             uniform sampler2D gColorMap; // duplicate on purpose\n\
             uniform vec4 gTint;\n\
             void main() {}\n",
        );

        let sources = load_shader_program(&vertex, &fragment, None).unwrap();
        assert_eq!(
            sources.samplers,
            vec![
                ("gColorMap".to_owned(), SamplerKind::Flat),
                ("gSkyMap".to_owned(), SamplerKind::Cube),
            ]
        );
        assert!(!sources.has_geometry_stage);

        std::fs::remove_file(vertex).unwrap();
        std::fs::remove_file(fragment).unwrap();
    }

    #[test]
    fn stage_without_entry_point_is_rejected() {
        let vertex = stage("broken.vert", "uniform sampler2D gColorMap;\n");
        let fragment = stage("ok.frag", "void main() {}\n");
        assert!(matches!(
            load_shader_program(&vertex, &fragment, None),
            Err(AssetError::InvalidData(_))
        ));
        std::fs::remove_file(vertex).unwrap();
        std::fs::remove_file(fragment).unwrap();
    }

    #[test]
    fn geometry_stage_is_recorded() {
        let vertex = stage("g.vert", "void main() {}\n");
        let fragment = stage("g.frag", "void main() {}\n");
        let geometry = stage("g.geom", "void main() {}\n");
        let sources =
            load_shader_program(&vertex, &fragment, Some(geometry.as_path())).unwrap();
        assert!(sources.has_geometry_stage);
        for path in [vertex, fragment, geometry] {
            std::fs::remove_file(path).unwrap();
        }
    }
}
