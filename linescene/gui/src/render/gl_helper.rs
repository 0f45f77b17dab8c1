use anyhow::{anyhow, Context};
use glow::HasContext;

/// Compiles and links a program from `(shader type, source)` pairs.
///
/// Each source is prefixed with the GLSL version declaration matching the context,
/// followed by `defines` (one per line).
pub unsafe fn compile_shader(
    gl: &glow::Context,
    shader_sources: &[(u32, &str)],
    defines: &[&str],
) -> anyhow::Result<glow::Program> {
    let shader_version = egui_glow::ShaderVersion::get(gl);
    let program = gl
        .create_program()
        .map_err(|e| anyhow!("Cannot create program: {e}"))?;

    let mut shaders = Vec::with_capacity(shader_sources.len());
    for (shader_type, shader_source) in shader_sources {
        let shader = gl
            .create_shader(*shader_type)
            .map_err(|e| anyhow!("Cannot create shader: {e}"))?;
        shader_source_with_defines(gl, shader, &shader_version, defines, shader_source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            gl.delete_program(program);
            return Err(anyhow!("Failed to compile shader (type 0x{shader_type:x}): {log}"));
        }

        gl.attach_shader(program, shader);
        shaders.push(shader);
    }

    gl.link_program(program);
    let linked = gl.get_program_link_status(program);

    for shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }

    if !linked {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(anyhow!("Failed to link program: {log}"));
    }

    Ok(program)
}

unsafe fn shader_source_with_defines(
    gl: &glow::Context,
    shader: glow::Shader,
    version: &egui_glow::ShaderVersion,
    defines: &[&str],
    source: &str,
) {
    let defines: String = defines.iter().map(|d| format!("{d}\n")).collect();
    gl.shader_source(
        shader,
        &format!("{}\n{}{}", version.version_declaration(), defines, source),
    );
}

/// Looks up a vertex attribute that the program is required to use
pub unsafe fn attrib_location(
    gl: &glow::Context,
    program: glow::Program,
    name: &str,
) -> anyhow::Result<u32> {
    gl.get_attrib_location(program, name)
        .with_context(|| format!("Attribute '{name}' not found in program"))
}
