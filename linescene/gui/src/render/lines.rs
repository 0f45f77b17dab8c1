use anyhow::anyhow;
use glow::HasContext;
use linescene_shared::{color::Color, geometry::LineGroup};

/// GPU copy of a [`LineGroup`]: one vertex buffer of endpoint pairs with a flat color.
pub struct LinesBufferGroup {
    pub name: String,
    pub color: Color,
    pub line_width: f32,

    vertex_buffer: glow::Buffer,
    vertex_array: Option<glow::VertexArray>,
    vertex_count: i32,
}

impl LinesBufferGroup {
    /// Uploads the vertex positions of `group`. There is no index buffer, the
    /// vertices are drawn as a line list.
    pub unsafe fn buffer_data(gl: &glow::Context, group: &LineGroup) -> anyhow::Result<Self> {
        let positions = group.positions();
        let vertex_count = i32::try_from(group.vertices.len())
            .map_err(|_| anyhow!("Line group '{}' has too many vertices", group.name))?;

        let vertex_buffer = gl
            .create_buffer()
            .map_err(|e| anyhow!("Cannot create vertex buffer: {e}"))?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&positions),
            glow::STATIC_DRAW,
        );
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(Self {
            name: group.name.clone(),
            color: group.color,
            line_width: group.line_width,
            vertex_buffer,
            vertex_array: None,
            vertex_count,
        })
    }

    /// Binds the vertex buffer to the position attribute of the program.
    pub unsafe fn prepare_vao(
        &mut self,
        gl: &glow::Context,
        position_location: u32,
    ) -> anyhow::Result<()> {
        let vertex_array = gl
            .create_vertex_array()
            .map_err(|e| anyhow!("Cannot create vertex array: {e}"))?;
        gl.bind_vertex_array(Some(vertex_array));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));

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

        if let Some(old) = self.vertex_array.replace(vertex_array) {
            gl.delete_vertex_array(old);
        }

        Ok(())
    }

    /// Expects the owning program to be in use with its color uniform at `color_location`.
    pub unsafe fn draw(
        &self,
        gl: &glow::Context,
        color_location: Option<&glow::UniformLocation>,
    ) {
        let Some(vertex_array) = self.vertex_array else {
            warn!("Line group '{}' drawn without a vertex array", self.name);
            return;
        };

        let [r, g, b, a] = self.color.to_array();
        gl.uniform_4_f32(color_location, r, g, b, a);
        gl.line_width(self.line_width);

        gl.bind_vertex_array(Some(vertex_array));
        gl.draw_arrays(glow::LINES, 0, self.vertex_count);
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(self, gl: &glow::Context) {
        if let Some(vertex_array) = self.vertex_array {
            gl.delete_vertex_array(vertex_array);
        }
        gl.delete_buffer(self.vertex_buffer);
    }
}
