/// WebGL2 implementation of the rendering backend
use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use cubes_core::lighting;
use cubes_core::{DrawCall, Mesh, RenderBackend, Scene};

use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

/// Buffers of one object, uploaded once
struct GpuMesh {
    position: WebGlBuffer,
    color: WebGlBuffer,
    normal: WebGlBuffer,
    indices: WebGlBuffer,
    count: i32,
}

struct Attribs {
    position: i32,
    color: i32,
    normal: i32,
}

struct Uniforms {
    projection: Option<WebGlUniformLocation>,
    model_view: Option<WebGlUniformLocation>,
    normal: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    light_direction: Option<WebGlUniformLocation>,
}

pub struct WebGlBackend {
    gl: GL,
    program: WebGlProgram,
    attribs: Attribs,
    uniforms: Uniforms,
    /// Indexed by `ObjectId`
    meshes: Vec<GpuMesh>,
    viewport: (i32, i32),
}

impl WebGlBackend {
    /// Compile the program and upload every object's mesh
    pub fn new(gl: GL, scene: &Scene) -> Result<Self, JsValue> {
        let program = init_shader_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;

        let attribs = Attribs {
            position: gl.get_attrib_location(&program, "aVertexPosition"),
            color: gl.get_attrib_location(&program, "aVertexColor"),
            normal: gl.get_attrib_location(&program, "aVertexNormal"),
        };
        let uniforms = Uniforms {
            projection: gl.get_uniform_location(&program, "uProjectionMatrix"),
            model_view: gl.get_uniform_location(&program, "uModelViewMatrix"),
            normal: gl.get_uniform_location(&program, "uNormalMatrix"),
            ambient: gl.get_uniform_location(&program, "uAmbientLight"),
            light_color: gl.get_uniform_location(&program, "uDirectionalLightColor"),
            light_direction: gl.get_uniform_location(&program, "uLightDirection"),
        };

        let meshes = scene
            .objects()
            .iter()
            .map(|object| upload_mesh(&gl, object.mesh()))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("uploaded {} meshes", meshes.len());

        Ok(Self {
            gl,
            program,
            attribs,
            uniforms,
            meshes,
            viewport: (0, 0),
        })
    }

    /// Match the drawing buffer size, in device pixels
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.viewport = (width, height);
    }

    fn bind_attribute(&self, buffer: &WebGlBuffer, location: i32, components: i32) {
        // Optimized-out attributes report -1
        let Ok(location) = u32::try_from(location) else {
            return;
        };
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }
}

impl RenderBackend for WebGlBackend {
    type Error = JsValue;

    fn begin_frame(&mut self) -> Result<(), JsValue> {
        let gl = &self.gl;
        gl.viewport(0, 0, self.viewport.0, self.viewport.1);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear_depth(1.0);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_func(GL::LEQUAL);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), JsValue> {
        let mesh = self
            .meshes
            .get(call.object.0)
            .ok_or_else(|| JsValue::from_str(&format!("object {} was never uploaded", call.object)))?;

        self.bind_attribute(&mesh.position, self.attribs.position, 3);
        self.bind_attribute(&mesh.color, self.attribs.color, 4);
        self.bind_attribute(&mesh.normal, self.attribs.normal, 3);
        self.gl
            .bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&mesh.indices));

        let model_view = call.model_view();
        let normal = lighting::normal_matrix(&model_view);
        let gl = &self.gl;
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.projection.as_ref(),
            false,
            call.projection.as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model_view.as_ref(),
            false,
            model_view.as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.normal.as_ref(), false, normal.as_slice());
        gl.uniform3fv_with_f32_array(self.uniforms.ambient.as_ref(), &call.light.ambient);
        gl.uniform3fv_with_f32_array(self.uniforms.light_color.as_ref(), &call.light.color);
        gl.uniform3fv_with_f32_array(
            self.uniforms.light_direction.as_ref(),
            call.light.direction.as_slice(),
        );

        gl.draw_elements_with_i32(GL::TRIANGLES, mesh.count, GL::UNSIGNED_SHORT, 0);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), JsValue> {
        // The browser presents when the animation frame callback returns
        Ok(())
    }
}

fn upload_mesh(gl: &GL, mesh: &Mesh) -> Result<GpuMesh, JsValue> {
    Ok(GpuMesh {
        position: create_buffer(gl, GL::ARRAY_BUFFER, bytemuck::cast_slice(&mesh.positions()))?,
        color: create_buffer(gl, GL::ARRAY_BUFFER, bytemuck::cast_slice(&mesh.colors()))?,
        normal: create_buffer(gl, GL::ARRAY_BUFFER, bytemuck::cast_slice(&mesh.normals()))?,
        indices: create_buffer(
            gl,
            GL::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&mesh.indices),
        )?,
        count: i32::try_from(mesh.triangle_vertex_count())
            .map_err(|_| JsValue::from_str("mesh has too many indices"))?,
    })
}

fn create_buffer(gl: &GL, target: u32, bytes: &[u8]) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("unable to create buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, GL::STATIC_DRAW);
    Ok(buffer)
}

fn init_shader_program(gl: &GL, vs_source: &str, fs_source: &str) -> Result<WebGlProgram, JsValue> {
    let vertex_shader = load_shader(gl, GL::VERTEX_SHADER, vs_source)?;
    let fragment_shader = load_shader(gl, GL::FRAGMENT_SHADER, fs_source)?;

    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("unable to create shader program"))?;
    gl.attach_shader(&program, &vertex_shader);
    gl.attach_shader(&program, &fragment_shader);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(JsValue::from_str(&format!(
            "unable to initialize the shader program: {}",
            info
        )))
    }
}

fn load_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&format!(
            "an error occurred compiling the shaders: {}",
            info
        )))
    }
}
