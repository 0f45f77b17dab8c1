use glam::Mat4;
use glow::HasContext;
use linescene_shared::geometry::LineGroup;

use super::{gl_helper, lines::LinesBufferGroup};

/// The line shader program, its matrix uniforms and the groups it draws.
pub struct LinesProgram {
    program: glow::Program,
    position_location: u32,
    u_projection: Option<glow::UniformLocation>,
    u_modelview: Option<glow::UniformLocation>,
    u_color: Option<glow::UniformLocation>,

    /// Drawn in insertion order
    groups: Vec<LinesBufferGroup>,
}

impl LinesProgram {
    pub unsafe fn new(gl: &glow::Context) -> anyhow::Result<Self> {
        let program = gl_helper::compile_shader(
            gl,
            &[
                (
                    glow::VERTEX_SHADER,
                    include_str!("../../assets/shaders/lines.vert"),
                ),
                (
                    glow::FRAGMENT_SHADER,
                    include_str!("../../assets/shaders/lines.frag"),
                ),
            ],
            &[],
        )?;

        let position_location = match gl_helper::attrib_location(gl, program, "a_position") {
            Ok(l) => l,
            Err(e) => {
                gl.delete_program(program);
                return Err(e);
            }
        };

        Ok(Self {
            program,
            position_location,
            u_projection: gl.get_uniform_location(program, "u_projection"),
            u_modelview: gl.get_uniform_location(program, "u_modelview"),
            u_color: gl.get_uniform_location(program, "u_color"),
            groups: vec![],
        })
    }

    pub unsafe fn set_projection(&self, gl: &glow::Context, projection: Mat4) {
        gl.use_program(Some(self.program));
        gl.uniform_matrix_4_f32_slice(
            self.u_projection.as_ref(),
            false,
            &projection.to_cols_array(),
        );
        gl.use_program(None);
    }

    pub unsafe fn set_modelview(&self, gl: &glow::Context, modelview: Mat4) {
        gl.use_program(Some(self.program));
        gl.uniform_matrix_4_f32_slice(
            self.u_modelview.as_ref(),
            false,
            &modelview.to_cols_array(),
        );
        gl.use_program(None);
    }

    pub unsafe fn add_buffer_group(
        &mut self,
        gl: &glow::Context,
        group: &LineGroup,
    ) -> anyhow::Result<()> {
        let mut buffer_group = LinesBufferGroup::buffer_data(gl, group)?;
        if let Err(e) = buffer_group.prepare_vao(gl, self.position_location) {
            buffer_group.destroy(gl);
            return Err(e);
        }

        self.groups.push(buffer_group);
        Ok(())
    }

    pub unsafe fn clear_buffer_groups(&mut self, gl: &glow::Context) {
        for group in self.groups.drain(..) {
            group.destroy(gl);
        }
    }

    /// Draws every group with this program
    pub unsafe fn bind_all(&self, gl: &glow::Context) {
        gl.use_program(Some(self.program));
        for group in &self.groups {
            group.draw(gl, self.u_color.as_ref());
        }
        gl.use_program(None);
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub unsafe fn destroy(mut self, gl: &glow::Context) {
        self.clear_buffer_groups(gl);
        gl.delete_program(self.program);
    }
}
