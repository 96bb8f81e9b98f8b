use web_sys::{Document, WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader};

use meshlit_core::{Error, Result, ShaderSources, ShaderStage};

/// Element holding the vertex shader text
pub const VERTEX_SHADER_ID: &str = "vertex-shader";
/// Element holding the fragment shader text
pub const FRAGMENT_SHADER_ID: &str = "fragment-shader";

pub fn compile_shader(gl: &Gl, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
    let shader_type = match stage {
        ShaderStage::Vertex => Gl::VERTEX_SHADER,
        ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| Error::Graphics("failed to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let success = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);

    if success {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".into());
        gl.delete_shader(Some(&shader));
        Err(Error::ShaderCompile { stage, log })
    }
}

pub fn link_program(gl: &Gl, vert: &WebGlShader, frag: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| Error::Graphics("failed to create program".into()))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);

    let success = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);

    if success {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program error".into());
        gl.delete_program(Some(&program));
        Err(Error::ShaderLink(log))
    }
}

/// Compile both stages and link them; the shader objects are released afterwards
pub fn create_program(gl: &Gl, sources: &ShaderSources) -> Result<WebGlProgram> {
    let vert = compile_shader(gl, ShaderStage::Vertex, &sources.vertex)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, &sources.fragment) {
        Ok(frag) => frag,
        Err(err) => {
            gl.delete_shader(Some(&vert));
            return Err(err);
        }
    };
    let program = link_program(gl, &vert, &frag);
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    program
}

/// Shader text from the page's shader elements, or the built-in Phong program
pub fn sources_from_document(document: &Document) -> ShaderSources {
    let read = |id: &str| {
        document
            .get_element_by_id(id)
            .and_then(|element| element.text_content())
            .filter(|text| !text.trim().is_empty())
    };
    match (read(VERTEX_SHADER_ID), read(FRAGMENT_SHADER_ID)) {
        (Some(vertex), Some(fragment)) => ShaderSources::new(vertex, fragment),
        _ => {
            log::info!("shader elements not found, using built-in Phong shaders");
            builtin_sources()
        }
    }
}

pub fn builtin_sources() -> ShaderSources {
    ShaderSources::new(VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE)
}

const VERTEX_SHADER_SOURCE: &str = r#"
precision mediump float;
attribute vec3 pos;
attribute vec3 normal;
uniform mat4 projectionMatrix;
uniform mat4 viewMatrix;
uniform mat4 modelMatrix;
uniform mat3 normalMatrix;
varying vec3 v_normal;
varying vec3 v_eye;

void main() {
    vec4 eye = viewMatrix * modelMatrix * vec4(pos, 1.0);
    v_eye = eye.xyz;
    v_normal = normalMatrix * normal;
    gl_Position = projectionMatrix * eye;
}
"#;

const FRAGMENT_SHADER_SOURCE: &str = r#"
precision mediump float;
uniform vec3 ambientLightColour;
uniform vec3 directionalLight;
uniform vec3 materialSpecular;
uniform float materialAmbient;
uniform float materialDiffuse;
uniform float shininess;
varying vec3 v_normal;
varying vec3 v_eye;

void main() {
    vec3 colour = ambientLightColour * materialAmbient;
    float strength = length(directionalLight);
    if (strength > 0.0) {
        vec3 n = normalize(v_normal);
        vec3 l = directionalLight / strength;
        float diffuse = max(dot(n, l), 0.0);
        vec3 r = reflect(-l, n);
        vec3 v = normalize(-v_eye);
        float specular = diffuse > 0.0 ? pow(max(dot(r, v), 0.0), shininess) : 0.0;
        colour += vec3(materialDiffuse * diffuse) + materialSpecular * specular;
    }
    gl_FragColor = vec4(colour, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use meshlit_core::gpu::{NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE};
    use meshlit_core::Uniform;

    #[test]
    fn test_builtin_sources_declare_interface() {
        let sources = builtin_sources();
        for uniform in Uniform::ALL {
            let declared = format!(" {};", uniform.name());
            assert!(
                sources.vertex.contains(&declared) || sources.fragment.contains(&declared),
                "{} is not declared",
                uniform.name()
            );
        }
        assert!(sources.vertex.contains(&format!("attribute vec3 {};", POSITION_ATTRIBUTE)));
        assert!(sources.vertex.contains(&format!("attribute vec3 {};", NORMAL_ATTRIBUTE)));
    }
}
