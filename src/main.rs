use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::{uvec2, vec2, UVec2};
use lumo::{CameraController, Engine, FrameInput, Scene, Viewport};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const DEFAULT_SCENE: &str = "models/CornellBox-Original.obj";
const WINDOW_SIZE: UVec2 = UVec2::new(800, 600);

fn main() -> Result<()> {
    env_logger::init();

    let scene_path = env::args().nth(1).unwrap_or(DEFAULT_SCENE.into());
    let scene = Scene::load(&scene_path)?;

    let event_loop = EventLoop::new()?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App { scene, state: None };

    event_loop.run_app(&mut app)?;

    Ok(())
}

struct App {
    scene: Scene,
    state: Option<State>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match State::new(event_loop, &self.scene) {
            Ok(state) => {
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("Failed to initialize: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                state.resize(uvec2(size.width, size.height));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }

                    state
                        .camera
                        .key(code, event.state == ElementState::Pressed);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state
                    .camera
                    .cursor(vec2(position.x as f32, position.y as f32));
            }

            WindowEvent::RedrawRequested => {
                state.render();
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    engine: Engine,
    viewport: Viewport,
    camera: CameraController,
}

impl State {
    fn new(event_loop: &ActiveEventLoop, scene: &Scene) -> Result<Self> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title("lumo")
                    .with_inner_size(PhysicalSize::new(
                        WINDOW_SIZE.x,
                        WINDOW_SIZE.y,
                    )),
            )?,
        );

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        ))
        .context("couldn't find a compatible graphics adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                // Float read-write storage images are an adapter-specific
                // capability; the accumulation image needs it
                required_features:
                    wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES,
                required_limits: Default::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let size = uvec2(size.width.max(1), size.height.max(1));

        let config = surface
            .get_default_config(&adapter, size.x, size.y)
            .ok_or_else(|| anyhow!("surface is not supported"))?;

        surface.configure(&device, &config);

        let camera = CameraController::new();
        let engine = Engine::new(&device, scene);

        engine.write_scene(&queue, scene);

        let viewport = engine.create_viewport(
            &device,
            size,
            config.format,
            FrameInput {
                viewport: size,
                origin: camera.origin(),
                cursor: camera.cursor_pos(),
            },
        );

        Ok(Self {
            window,
            surface,
            config,
            device,
            queue,
            engine,
            viewport,
            camera,
        })
    }

    fn resize(&mut self, size: UVec2) {
        if size.x == 0 || size.y == 0 {
            return;
        }

        self.config.width = size.x;
        self.config.height = size.y;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self) {
        // Acquire first; the sample counter only advances for frames that
        // actually dispatch
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                // Observed, not acted upon; the next frame tries again
                log::error!("Couldn't acquire frame: {err}");
                return;
            }
        };

        self.camera.step();

        self.viewport.prepare(
            &self.engine,
            &self.device,
            FrameInput {
                viewport: uvec2(self.config.width, self.config.height),
                origin: self.camera.origin(),
                cursor: self.camera.cursor_pos(),
            },
        );

        self.viewport.flush(&self.queue);

        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("lumo_frame"),
            },
        );

        self.viewport.render(&mut encoder, &view);
        self.queue.submit([encoder.finish()]);

        frame.present();
    }
}
