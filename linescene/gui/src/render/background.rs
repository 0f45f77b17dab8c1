use anyhow::anyhow;
use glow::HasContext;
use linescene_shared::color::Color;

use super::gl_helper;

/// Full-viewport quad shaded with a vertical gradient.
pub struct GradientBackground {
    shader: glow::Program,
    quad: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    u_top: Option<glow::UniformLocation>,
    u_bottom: Option<glow::UniformLocation>,
}

impl GradientBackground {
    /// Clip-space x, y and the gradient height (0 = bottom, 1 = top), as a triangle strip
    const VERTEX_DATA: &'static [[f32; 3]] = &[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
    ];

    pub unsafe fn new(gl: &glow::Context) -> anyhow::Result<Self> {
        let shader = gl_helper::compile_shader(
            gl,
            &[
                (
                    glow::VERTEX_SHADER,
                    include_str!("../../assets/shaders/background.vert"),
                ),
                (
                    glow::FRAGMENT_SHADER,
                    include_str!("../../assets/shaders/background.frag"),
                ),
            ],
            &[],
        )?;
        let position_location = match gl_helper::attrib_location(gl, shader, "a_position") {
            Ok(l) => l,
            Err(e) => {
                gl.delete_program(shader);
                return Err(e);
            }
        };

        let quad = match gl.create_vertex_array() {
            Ok(quad) => quad,
            Err(e) => {
                gl.delete_program(shader);
                return Err(anyhow!("Cannot create vertex array: {e}"));
            }
        };
        let vertex_buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_vertex_array(quad);
                gl.delete_program(shader);
                return Err(anyhow!("Cannot create vertex buffer: {e}"));
            }
        };

        gl.bind_vertex_array(Some(quad));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(Self::VERTEX_DATA),
            glow::STATIC_DRAW,
        );
        gl.enable_vertex_attrib_array(position_location);
        gl.vertex_attrib_pointer_f32(
            position_location,
            3,
            glow::FLOAT,
            false,
            std::mem::size_of::<[f32; 3]>() as i32,
            0,
        );
        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(Self {
            u_top: gl.get_uniform_location(shader, "u_top"),
            u_bottom: gl.get_uniform_location(shader, "u_bottom"),
            shader,
            quad,
            vertex_buffer,
        })
    }

    /// Draws without touching the depth buffer, so anything drawn afterwards ends up on top.
    pub unsafe fn draw(&self, gl: &glow::Context, top: Color, bottom: Color) {
        let depth_test = gl.is_enabled(glow::DEPTH_TEST);
        gl.disable(glow::DEPTH_TEST);
        gl.depth_mask(false);

        gl.use_program(Some(self.shader));
        gl.uniform_4_f32_slice(self.u_top.as_ref(), &top.to_array());
        gl.uniform_4_f32_slice(self.u_bottom.as_ref(), &bottom.to_array());

        gl.bind_vertex_array(Some(self.quad));
        gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
        gl.use_program(None);

        gl.depth_mask(true);
        if depth_test {
            gl.enable(glow::DEPTH_TEST);
        }
    }

    pub unsafe fn destroy(self, gl: &glow::Context) {
        gl.delete_vertex_array(self.quad);
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_program(self.shader);
    }
}
