use super::Bindable;

pub struct DescriptorSet {
    bind_group: wgpu::BindGroup,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl DescriptorSet {
    pub fn builder<'ctx>(label: impl ToString) -> DescriptorSetBuilder<'ctx> {
        DescriptorSetBuilder {
            label: label.to_string(),
            next_binding: 0,
            layouts: Default::default(),
            resources: Default::default(),
        }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

pub struct DescriptorSetBuilder<'ctx> {
    label: String,
    next_binding: u32,
    layouts: Vec<wgpu::BindGroupLayoutEntry>,
    resources: Vec<(u32, wgpu::BindingResource<'ctx>)>,
}

impl<'ctx> DescriptorSetBuilder<'ctx> {
    pub fn add(self, item: &'ctx dyn Bindable) -> Self {
        let binding = self.next_binding;

        self.add_at(binding, item)
    }

    /// Attaches `item` at an explicit slot; used where the shader side
    /// declares a well-known binding number instead of the next free one.
    pub fn add_at(mut self, binding: u32, item: &'ctx dyn Bindable) -> Self {
        for (layout, resource) in item.bind(binding) {
            let slot = layout.binding;

            self.next_binding = slot + 1;
            self.layouts.push(layout);
            self.resources.push((slot, resource));
        }

        self
    }

    pub fn build(self, device: &wgpu::Device) -> DescriptorSet {
        let label = self.label;

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                entries: &self.layouts,
            });

        let entries: Vec<_> = self
            .resources
            .into_iter()
            .map(|(binding, resource)| wgpu::BindGroupEntry {
                binding,
                resource,
            })
            .collect();

        let bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&label),
                layout: &bind_group_layout,
                entries: &entries,
            });

        DescriptorSet {
            bind_group,
            bind_group_layout,
        }
    }
}
