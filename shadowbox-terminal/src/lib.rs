/// Terminal front end for the shadowbox viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use shadowbox_core::preset::DEFAULT_PRESET;
use shadowbox_core::{
    AnimationChannel, AnimationConfig, CameraConfig, FrameDriver, FrameOutput, Mesh, Plane,
    Preset, PresetId, ViewCamera,
};

pub mod input;
pub mod renderer;

pub use input::{Command, HeldKeys, MouseDrag};
pub use renderer::AsciiRenderer;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(2);
/// Half-size of the drawn ground patch.
const GROUND_EXTENT: f32 = 8.0;

/// Startup options for the viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub ground_y: f32,
    pub start_preset: PresetId,
    pub shadows: bool,
    pub target_fps: u32,
    /// Hold timeout for terminals that never report key releases.
    pub hold_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
            ground_y: -3.0,
            start_preset: DEFAULT_PRESET,
            shadows: true,
            target_fps: 60,
            hold_timeout: Duration::from_millis(500),
        }
    }
}

/// Viewer state that does not touch the terminal.
pub struct ViewerState {
    driver: FrameDriver,
    shadows: bool,
    ground: bool,
    wireframe: bool,
    running: bool,
    status: Option<(String, Instant)>,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut driver = FrameDriver::new(
            config.camera.clone(),
            config.animation.clone(),
            Plane::ground(config.ground_y),
        );
        driver.animation_mut().apply_preset(config.start_preset);

        Self {
            driver,
            shadows: config.shadows,
            ground: true,
            wireframe: false,
            running: true,
            status: None,
        }
    }

    /// Carry out a command and return a short description of its effect.
    pub fn apply(&mut self, command: Command) -> String {
        let animation = self.driver.animation_mut();
        let message = match command {
            Command::Quit => {
                self.running = false;
                "quitting".to_string()
            }
            Command::ToggleChannel(channel) => {
                let on = animation.toggle_channel(channel);
                format!("{} {}", channel, on_off(on))
            }
            Command::ToggleEasing => format!("easing {}", on_off(animation.toggle_easing())),
            Command::TogglePause => {
                if animation.toggle_pause() {
                    "paused".to_string()
                } else {
                    "resumed".to_string()
                }
            }
            Command::AdjustSpeed(delta) => {
                format!("speed {:.1}x", animation.adjust_global_speed(delta))
            }
            Command::ApplyPreset(id) => {
                let applied = animation.apply_preset(id);
                match Preset::by_id(id) {
                    Some(preset) if applied => format!("preset {}: {}", preset.id, preset.name),
                    _ => format!("unknown preset {}", id),
                }
            }
            Command::ResetAnimations => {
                animation.reset_all();
                "animations reset".to_string()
            }
            Command::ResetAll => {
                animation.reset_all();
                self.driver.camera_mut().reset();
                self.driver.reset_model_pose();
                self.wireframe = false;
                "view reset".to_string()
            }
            Command::MoveLight(direction) => {
                let base = animation.move_light(direction);
                format!("light base ({:.1}, {:.1}, {:.1})", base.x, base.y, base.z)
            }
            Command::ToggleShadows => {
                self.shadows = !self.shadows;
                format!("shadows {}", on_off(self.shadows))
            }
            Command::ToggleGround => {
                self.ground = !self.ground;
                format!("ground {}", on_off(self.ground))
            }
            Command::ToggleWireframe => {
                self.wireframe = !self.wireframe;
                if self.wireframe {
                    "wireframe".to_string()
                } else {
                    "solid".to_string()
                }
            }
        };
        debug!("{:?}: {}", command, message);
        message
    }

    /// Apply a command and keep its message on screen for a while.
    pub fn apply_with_status(&mut self, command: Command, now: Instant) {
        let message = self.apply(command);
        self.status = Some((message, now));
    }

    /// Current status message, if it has not expired.
    pub fn status(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, at)| now.saturating_duration_since(*at) < STATUS_TTL)
            .map(|(message, _)| message.as_str())
    }

    /// One-line summary of the camera and animation state.
    pub fn hud(&self, fps: f32) -> String {
        let animation = self.driver.animation();
        let camera = self.driver.camera();
        let preset = Preset::by_id(animation.active_preset())
            .map(|p| p.name)
            .unwrap_or("custom");
        let flag = |channel: AnimationChannel, label: char| {
            if animation.is_enabled(channel) {
                label.to_ascii_uppercase()
            } else {
                label
            }
        };

        format!(
            "{} | {:.1}x{} | yaw {:.0} pitch {:.0} dist {:.1} | {}{}{}{} | {:.0} fps",
            preset,
            animation.speed_multiplier(),
            if animation.is_paused() { " paused" } else { "" },
            camera.yaw(),
            camera.pitch(),
            camera.distance(),
            flag(AnimationChannel::Model, 'm'),
            flag(AnimationChannel::Orbit, 'o'),
            flag(AnimationChannel::Bobbing, 'b'),
            flag(AnimationChannel::Path, 'p'),
            fps,
        )
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    pub fn shadows(&self) -> bool {
        self.shadows
    }

    pub fn ground(&self) -> bool {
        self.ground
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    mesh: Mesh,
    state: ViewerState,
    keys: HeldKeys,
    mouse: MouseDrag,
    renderer: AsciiRenderer,
    frame_time: Duration,
    hold_timeout: Duration,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            mesh,
            state: ViewerState::new(&config),
            keys: HeldKeys::new(Some(config.hold_timeout)),
            mouse: MouseDrag::default(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_secs(1) / config.target_fps.max(1),
            hold_timeout: config.hold_timeout,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        // Release events let held keys end exactly; without them holds time out.
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keys = HeldKeys::new(None);
        } else {
            self.keys = HeldKeys::new(Some(self.hold_timeout));
        }
        info!("terminal key release events: {}", enhanced);

        let result = self.main_loop();

        // Cleanup
        if enhanced {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.state.is_running() {
            let frame_start = Instant::now();

            self.handle_input()?;
            self.keys.expire(frame_start);

            let output = self
                .state
                .driver_mut()
                .advance(&self.keys.controls(), self.keys.turbo());
            self.render(&output)?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            let since = now - self.last_fps_sample;
            if since.as_secs() >= 1 {
                self.fps = self.frame_count as f32 / since.as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = self.keys.handle(&key, now) {
                        self.state.apply_with_status(command, now);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some((tilt, spin)) = self.mouse.handle(&mouse) {
                        self.state.driver_mut().rotate_model(tilt, spin);
                    }
                }
                Event::Resize(width, height) => {
                    debug!("resized to {}x{}", width, height);
                    self.renderer = AsciiRenderer::new(width as usize, height as usize);
                }
                Event::FocusLost => self.keys.clear(),
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self, output: &FrameOutput) -> io::Result<()> {
        let driver = self.state.driver();
        let camera = ViewCamera::from_orbit(driver.camera(), self.renderer.aspect());
        let view_projection = camera.view_projection();

        self.renderer.clear();
        if self.state.ground() {
            let ground_y = driver.ground().point().y;
            self.renderer
                .render_ground(ground_y, GROUND_EXTENT, &view_projection);
        }
        if self.state.shadows() {
            self.renderer
                .render_shadow(&self.mesh, &output.shadow_model, &view_projection);
        }
        let light = &output.light_position;
        if self.state.wireframe() {
            self.renderer
                .render_wireframe(&self.mesh, &output.model, &view_projection, light);
        } else {
            self.renderer
                .render_mesh(&self.mesh, &output.model, &view_projection, light);
        }
        self.renderer
            .render_light(&output.light_position, &view_projection);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Overlays
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.state.hud(self.fps)),
            ResetColor
        )?;
        if let Some(message) = self.state.status(Instant::now()) {
            let bottom = (self.renderer.height() as u16).saturating_sub(1);
            queue!(
                stdout,
                cursor::MoveTo(0, bottom),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Green),
                Print(message),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
