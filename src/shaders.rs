pub struct Shaders {
    pub tracing: wgpu::ShaderModule,
    pub drawing: wgpu::ShaderModule,
}

pub(crate) const TRACING_SRC: &str = include_str!("shaders/tracing.wgsl");
pub(crate) const DRAWING_SRC: &str = include_str!("shaders/drawing.wgsl");

impl Shaders {
    /// Compiles both shader modules; a kernel that doesn't validate is a
    /// fatal startup error, surfaced by wgpu as a panic.
    pub fn new(device: &wgpu::Device) -> Self {
        let tracing = device.create_shader_module(wgpu::include_wgsl!(
            "shaders/tracing.wgsl"
        ));

        let drawing = device.create_shader_module(wgpu::include_wgsl!(
            "shaders/drawing.wgsl"
        ));

        Self { tracing, drawing }
    }
}
