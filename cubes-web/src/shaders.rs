/// GLSL ES 1.00 sources for the lit vertex-color program

pub const VERTEX_SHADER: &str = r#"
attribute vec4 aVertexPosition;
attribute vec4 aVertexColor;
attribute vec3 aVertexNormal;

uniform mat4 uNormalMatrix;
uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;

uniform vec3 uAmbientLight;
uniform vec3 uDirectionalLightColor;
uniform vec3 uLightDirection;

varying lowp vec4 vColor;
varying highp vec3 vLighting;

void main(void) {
    gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;

    highp vec3 normal = normalize((uNormalMatrix * vec4(aVertexNormal, 0.0)).xyz);
    highp float directional = max(dot(normal, normalize(uLightDirection)), 0.0);
    vLighting = uAmbientLight + (uDirectionalLightColor * directional);
    vColor = aVertexColor;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
varying lowp vec4 vColor;
varying highp vec3 vLighting;

void main(void) {
    gl_FragColor = vec4(vColor.rgb * vLighting, vColor.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names_are_declared() {
        for name in [
            "aVertexPosition",
            "aVertexColor",
            "aVertexNormal",
            "uProjectionMatrix",
            "uModelViewMatrix",
            "uNormalMatrix",
            "uAmbientLight",
            "uDirectionalLightColor",
            "uLightDirection",
        ] {
            assert!(VERTEX_SHADER.contains(name), "{name} missing from vertex shader");
        }
    }

    #[test]
    fn test_varyings_match() {
        for varying in ["varying lowp vec4 vColor;", "varying highp vec3 vLighting;"] {
            assert!(VERTEX_SHADER.contains(varying));
            assert!(FRAGMENT_SHADER.contains(varying));
        }
    }
}
