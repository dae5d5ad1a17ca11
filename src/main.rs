//! Knotwave - audio-reactive torus-knot scene editor
//!
//! A torus-knot mesh driven by a declarative scene document, with geometry,
//! rotation, and scale modulated per frame by live audio band energy.

mod audio;
mod cli;
mod controller;
mod editor;
mod error;
mod knot;
mod modulation;
mod params;
mod rendering;
mod scene;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use clap::Parser;
use glam::{Mat4, Vec3};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::{AudioSource, AudioSystem};
use cli::Args;
use controller::{Command, SceneController};
use editor::LiveEditor;
use knot::KnotSystem;
use modulation::{get_audio_bands, AudioBands};
use params::{AnalyzerConfig, RenderConfig};
use rendering::{color_or_default, RenderSystem, Uniforms};
use scene::{yaml, SceneConfig};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Scene and animation state
    controller: SceneController,
    knot: KnotSystem,
    audio: Option<AudioSystem>,

    // Live-preview editing of a watched YAML file
    editor: LiveEditor,
    edit_path: Option<PathBuf>,
    edit_mtime: Option<SystemTime>,

    // Configuration
    render_config: RenderConfig,
    analyzer_config: AnalyzerConfig,
    audio_source: AudioSource,
}

impl App {
    fn new(args: &Args) -> Self {
        // Startup document load: a failure is logged and leaves the
        // application in its default state, never fatal.
        let config = match &args.scene {
            Some(path) => match yaml::load_file(path) {
                Ok(config) => {
                    log::info!("loaded scene from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("startup scene load failed ({}), using defaults", e);
                    SceneConfig::default()
                }
            },
            None => SceneConfig::default(),
        };

        let controller = SceneController::new(config);
        let knot = KnotSystem::new(controller.selected_object());

        // Seed the editor with the watched file's current content so only
        // later modifications schedule a preview.
        let mut editor = LiveEditor::new();
        let mut edit_mtime = None;
        if let Some(path) = &args.edit {
            if let Ok(text) = std::fs::read_to_string(path) {
                edit_mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
                editor.open(text);
            }
        }

        Self {
            window: None,
            render_system: None,
            controller,
            knot,
            audio: None,
            editor,
            edit_path: args.edit.clone(),
            edit_mtime,
            render_config: RenderConfig::default(),
            analyzer_config: args.analyzer_config(),
            audio_source: args.audio_source(),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Knotwave - Audio-Reactive Torus Knot")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system =
            pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.knot.mesh)).unwrap();

        // Initialize audio; a missing device leaves the scene static
        // rather than aborting.
        match AudioSystem::new(self.analyzer_config.clone(), self.audio_source.clone()) {
            Ok(audio) => self.audio = Some(audio),
            Err(e) => log::warn!("audio unavailable ({}), animation disabled", e),
        }

        println!("\nKnotwave is running!");
        println!("R: toggle rotation  S: toggle scale  Tab: next object");
        println!("E: export scene.yaml  Esc: quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                self.render_config.window_width = size.width.max(1);
                self.render_config.window_height = size.height.max(1);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(code, event_loop),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    fn handle_key(&mut self, code: KeyCode, event_loop: &winit::event_loop::ActiveEventLoop) {
        let command = match code {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::KeyR => Command::ToggleRotation,
            KeyCode::KeyS => Command::ToggleScale,
            KeyCode::Tab => {
                let next = (self.controller.selected() + 1)
                    % self.controller.config().objects.len();
                Command::SelectObject(next)
            }
            KeyCode::KeyE => {
                self.export_scene();
                return;
            }
            _ => return,
        };

        if let Err(e) = self.controller.apply(command) {
            log::warn!("command rejected: {}", e);
        }
    }

    fn export_scene(&self) {
        match self.controller.export_yaml() {
            Ok(text) => match std::fs::write("scene.yaml", &text) {
                Ok(()) => log::info!("scene exported to scene.yaml"),
                Err(e) => log::warn!("scene export failed: {}", e),
            },
            Err(e) => log::warn!("scene export failed: {}", e),
        }
    }

    /// Feed edits of the watched YAML file into the debounced editor and
    /// apply a finished preview to the live scene.
    fn poll_live_edit(&mut self, now: Instant) {
        let Some(path) = &self.edit_path else {
            return;
        };

        if let Ok(meta) = std::fs::metadata(path) {
            let mtime = meta.modified().ok();
            if mtime.is_some() && mtime != self.edit_mtime {
                self.edit_mtime = mtime;
                if let Ok(text) = std::fs::read_to_string(path) {
                    self.editor.on_input(&text, now);
                }
            }
        }

        if let Some(result) = self.editor.poll(now) {
            match result {
                Ok(config) => {
                    self.controller.set_config(config);
                    log::info!("{}", self.editor.status());
                }
                Err(_) => log::warn!("{}", self.editor.status()),
            }
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        if self.render_system.is_none() {
            return;
        }

        self.poll_live_edit(Instant::now());

        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        // Current audio band energies (static scene without audio)
        let bands = match &self.audio {
            Some(audio) => get_audio_bands(&audio.spectrum()),
            None => AudioBands::default(),
        };

        // Service committed config changes before animating, so the frame
        // never renders against mismatched geometry/material.
        if self.controller.take_rebuild() {
            self.knot.rebind(self.controller.selected_object());
        }

        let object = self.controller.selected_object();

        // Per-frame modulated geometry rebuild plus transform animation
        let model = self.knot.update(
            object,
            &bands,
            self.controller.rotate_anim,
            self.controller.scale_anim,
        );
        render_system.replace_geometry(&self.knot.mesh);

        // Camera fixed on the +Z axis, looking at the origin
        let camera_pos = Vec3::new(0.0, 0.0, self.render_config.camera_z);
        let view = Mat4::look_at_rh(camera_pos, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.render_config.fov_degrees.to_radians(),
            self.render_config.aspect_ratio(),
            self.render_config.near_plane,
            self.render_config.far_plane,
        );

        let object = self.controller.selected_object();
        let uniforms = Uniforms::new(
            proj * view,
            model,
            camera_pos,
            &object.material,
            &self.controller.config().lighting,
        );
        render_system.update_uniforms(&uniforms);
        render_system.set_clear_color(color_or_default(&self.controller.config().background));

        if let Err(e) = render_system.render(object.visible) {
            log::error!("render error: {:?}", e);
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Knotwave - audio-reactive torus-knot scene editor");
    println!("Initializing systems...\n");

    let mut app = App::new(&args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
