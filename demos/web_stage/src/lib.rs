// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web example: a WebGL2 scene driven by `limelight_backend_web`.
//!
//! Fills the window with a canvas showing a lit, spinning RGB triangle that
//! can be dragged around. The frame strategy comes from the query string:
//!
//! - `?render=continuous` (default): redraw every animation frame
//! - `?render=bloom`: redraw every frame through a two-pass glow compositor
//! - `?render=ondemand`: redraw only after a drag, a resize, or while the
//!   drag's damping settles
//!
//! `?sky=<url>` shows an image behind the scene.
//!
//! `?mode=pro` turns off the stats panel, console tracing, and the dev-tools
//! globals.
//!
//! Build with: `wasm-pack build --target web demos/web_stage`
//!
//! Then serve `demos/web_stage/` and open `index.html` in a browser.

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Size;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, MouseEvent, WebGl2RenderingContext, WebGlProgram,
    WebGlShader, WebGlUniformLocation,
};

use limelight_backend_web::{
    CanvasSurface, ConsoleSink, DevtoolsBridge, RafHost, StatsPanel, WebRenderLoop, attach_overlay,
};
use limelight_core::backend::{
    Background, Compositor, InputController, InputTarget, Listener, OverlayRenderer, SceneGraph,
    SceneRenderer,
};
use limelight_core::camera::{CameraParams, PerspectiveCamera};
use limelight_core::config::{BloomParams, Color, Mode, StageConfig};
use limelight_core::driver::Driver;
use limelight_core::light::Light;
use limelight_core::stage::{DebugContext, Stage, StageParts};
use limelight_core::surface::BackingSize;

const CLEAR_COLOR: Color = Color::from_hex(0x10_10_20);

/// Radians of yaw per CSS pixel dragged.
const DRAG_SPEED: f64 = 0.01;
/// Fraction of drag velocity kept per damped update.
const DAMPING: f64 = 0.9;
/// Velocity below which damping stops reporting changes.
const REST_VELOCITY: f64 = 1e-4;

const GL_VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec3 a_color;
uniform float u_angle;
uniform float u_aspect;
uniform float u_scale;
out vec3 v_color;
void main() {
    float c = cos(u_angle);
    float s = sin(u_angle);
    vec2 p = a_position * u_scale;
    vec2 r = vec2(p.x * c - p.y * s, p.x * s + p.y * c);
    gl_Position = vec4(r.x / u_aspect, r.y, 0.0, 1.0);
    v_color = a_color;
}
";

const GL_FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
uniform float u_light;
uniform float u_alpha;
in vec3 v_color;
out vec4 fragColor;
void main() {
    fragColor = vec4(v_color * u_light, u_alpha);
}
";

type StageGl = Stage<Scene, PerspectiveCamera>;

/// Entry point, called by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let mode = query_param(&window, "mode")
        .and_then(|m| m.parse::<Mode>().ok())
        .unwrap_or_default();
    let render = query_param(&window, "render");
    let sky = query_param(&window, "sky");

    let container = create_container(&document)?;
    body.append_child(&container)?;

    let surface = CanvasSurface::create(&document)?;
    container.append_child(surface.canvas())?;
    let overlay = create_overlay(&document)?;
    attach_overlay(&container, &overlay)?;

    let gl = Rc::new(Gl::new(surface.canvas())?);
    let yaw = Rc::new(Cell::new(0.0));
    let camera = surface.camera(&CameraParams::DEFAULT);
    let canvas: HtmlElement = surface.canvas().clone().unchecked_into();

    let parts = StageParts {
        scene: Scene {
            light: 0.0,
            spin: 0.0,
            yaw: Rc::clone(&yaw),
            gl: Rc::clone(&gl),
            backdrop: container.clone(),
        },
        camera,
        renderer: Box::new(GlRenderer {
            surface,
            gl: Rc::clone(&gl),
        }),
        overlay: Box::new(LabelOverlay {
            element: overlay.clone(),
        }),
        controls: Box::new(DragControls::new(canvas, overlay, yaw)),
    };

    let panel = if mode.is_dev() {
        Some(StatsPanel::new(&document, &container)?)
    } else {
        None
    };
    let config = StageConfig::for_mode(mode).with_clear_color(CLEAR_COLOR);
    let mut stage = Stage::new(config, parts, move || {
        panel
            .map_or_else(DebugContext::default, DebugContext::with_monitor)
            .traced(ConsoleSink::new())
    });
    if let Some(url) = sky.as_deref() {
        stage.set_background(Background::Skybox(url));
    }

    if let Some(mut bridge) = DevtoolsBridge::for_mode(mode) {
        bridge.expose("__limelight_gl", gl.context.as_ref())?;
        // Keep the globals for the lifetime of the page.
        core::mem::forget(bridge);
    }

    let host = Rc::new(RafHost::with_window(window));
    let render_loop = match render.as_deref() {
        Some("bloom") => WebRenderLoop::start(host, move |host| {
            Driver::start_bloom(
                stage,
                host,
                Box::new(GlBloom::new(Rc::clone(&gl))),
                BloomParams::DEFAULT,
                Some(Box::new(spin)),
            )
        }),
        Some("ondemand" | "on-demand") => {
            WebRenderLoop::start(host, move |host| Driver::start_on_demand(stage, host, None))
        }
        _ => WebRenderLoop::start(host, move |host| {
            Driver::start_continuous(stage, host, Some(Box::new(spin)))
        }),
    };

    // Keep the render loop alive.
    core::mem::forget(render_loop);

    Ok(())
}

fn spin(stage: &mut StageGl, secs: f64) {
    stage.scene.spin = secs * 0.8;
}

fn query_param(window: &web_sys::Window, key: &str) -> Option<String> {
    let search = window.location().search().ok()?;
    // Parse "?key=value" or "&key=value".
    search.trim_start_matches('?').split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.into())
    })
}

fn create_container(doc: &Document) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element("div")?.unchecked_into();
    let s = el.style();
    s.set_property("width", "100vw")?;
    s.set_property("height", "100vh")?;
    s.set_property("position", "relative")?;
    s.set_property("overflow", "hidden")?;
    Ok(el)
}

fn create_overlay(doc: &Document) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element("div")?.unchecked_into();
    let s = el.style();
    s.set_property("color", "#e0e0f0")?;
    s.set_property("font", "13px sans-serif")?;
    s.set_property("padding", "8px")?;
    s.set_property("box-sizing", "border-box")?;
    s.set_property("touch-action", "none")?;
    Ok(el)
}

// -- scene ------------------------------------------------------------------

/// The whole scene: one triangle.
struct Scene {
    /// Sum of light intensities added during setup.
    light: f32,
    /// Animated rotation, radians.
    spin: f64,
    /// Rotation from dragging, radians. Shared with [`DragControls`].
    yaw: Rc<Cell<f64>>,
    gl: Rc<Gl>,
    /// Element behind the canvas that shows a skybox image.
    backdrop: HtmlElement,
}

impl Scene {
    fn angle(&self) -> f64 {
        self.spin + self.yaw.get()
    }

    fn light(&self) -> f32 {
        self.light.min(1.0)
    }
}

impl SceneGraph for Scene {
    fn add_light(&mut self, light: &Light) {
        self.light += light.params().intensity;
    }

    fn set_background(&mut self, background: Background<'_>) {
        let style = self.backdrop.style();
        match background {
            Background::Color(color) => {
                self.gl.clear.set(opaque(color));
                let _ = style.remove_property("background");
            }
            // The browser fetches the image; a transparent clear lets it
            // show through the canvas.
            Background::Skybox(url) => {
                self.gl.clear.set([0.0; 4]);
                let image = format!("url(\"{url}\") center / cover");
                let _ = style.set_property("background", &image);
            }
        }
    }
}

// -- WebGL ------------------------------------------------------------------

struct Gl {
    context: WebGl2RenderingContext,
    angle: WebGlUniformLocation,
    aspect: WebGlUniformLocation,
    scale: WebGlUniformLocation,
    light: WebGlUniformLocation,
    alpha: WebGlUniformLocation,
    /// Clear color, premultiplied RGBA.
    clear: Cell<[f32; 4]>,
}

/// Uniforms for one draw of the triangle.
struct Draw {
    angle: f64,
    aspect: f64,
    scale: f32,
    light: f32,
    alpha: f32,
}

impl Gl {
    fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context: WebGl2RenderingContext = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("browser does not support WebGL2"))?
            .unchecked_into();
        let gl = &context;

        let vs = compile_gl_shader(gl, WebGl2RenderingContext::VERTEX_SHADER, GL_VERTEX_SHADER)?;
        let fs = compile_gl_shader(
            gl,
            WebGl2RenderingContext::FRAGMENT_SHADER,
            GL_FRAGMENT_SHADER,
        )?;
        let program = link_gl_program(gl, &vs, &fs)?;
        gl.use_program(Some(&program));

        // Triangle: position (x, y) + color (r, g, b) per vertex.
        #[rustfmt::skip]
        let vertices: [f32; 15] = [
             0.0,  0.6,    1.0, 0.2, 0.2,
            -0.5, -0.4,    0.2, 1.0, 0.2,
             0.5, -0.4,    0.2, 0.4, 1.0,
        ];
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("create GL buffer failed"))?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_array_buffer_view(
            WebGl2RenderingContext::ARRAY_BUFFER,
            &js_sys::Float32Array::from(&vertices[..]),
            WebGl2RenderingContext::STATIC_DRAW,
        );
        let stride = 5 * 4;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, WebGl2RenderingContext::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, WebGl2RenderingContext::FLOAT, false, stride, 8);

        let uniform = |name: &str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| JsValue::from_str(&format!("missing uniform {name}")))
        };
        Ok(Self {
            angle: uniform("u_angle")?,
            aspect: uniform("u_aspect")?,
            scale: uniform("u_scale")?,
            light: uniform("u_light")?,
            alpha: uniform("u_alpha")?,
            clear: Cell::new(opaque(CLEAR_COLOR)),
            context,
        })
    }

    fn begin(&self, backing: BackingSize) {
        let gl = &self.context;
        let w = i32::try_from(backing.width).unwrap_or(i32::MAX);
        let h = i32::try_from(backing.height).unwrap_or(i32::MAX);
        gl.viewport(0, 0, w, h);
        let [r, g, b, a] = self.clear.get();
        gl.clear_color(r, g, b, a);
        gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "angles and aspect ratios are small; f32 is what GLSL takes"
    )]
    fn draw(&self, d: &Draw) {
        let gl = &self.context;
        gl.uniform1f(Some(&self.angle), d.angle as f32);
        gl.uniform1f(Some(&self.aspect), d.aspect.max(f64::EPSILON) as f32);
        gl.uniform1f(Some(&self.scale), d.scale);
        gl.uniform1f(Some(&self.light), d.light);
        gl.uniform1f(Some(&self.alpha), d.alpha);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);
    }
}

fn opaque(color: Color) -> [f32; 4] {
    let [r, g, b] = color.to_rgb_f32();
    [r, g, b, 1.0]
}

fn compile_gl_shader(
    gl: &WebGl2RenderingContext,
    shader_type: u32,
    source: &str,
) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| JsValue::from_str("create GL shader failed"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, WebGl2RenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        return Err(JsValue::from_str(&format!(
            "GL shader compile failed: {log}"
        )));
    }
    Ok(shader)
}

fn link_gl_program(
    gl: &WebGl2RenderingContext,
    vs: &WebGlShader,
    fs: &WebGlShader,
) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("create GL program failed"))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    if !gl
        .get_program_parameter(&program, WebGl2RenderingContext::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        return Err(JsValue::from_str(&format!("GL program link failed: {log}")));
    }
    Ok(program)
}

/// Draws the scene straight to the canvas.
struct GlRenderer {
    surface: CanvasSurface,
    gl: Rc<Gl>,
}

impl SceneRenderer<Scene, PerspectiveCamera> for GlRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.gl.begin(self.surface.backing_size());
        self.gl.draw(&Draw {
            angle: scene.angle(),
            aspect: camera.aspect,
            scale: 1.0,
            light: scene.light(),
            alpha: 1.0,
        });
    }

    fn displayed_size(&self) -> Size {
        self.surface.displayed_size()
    }

    fn backing_size(&self) -> BackingSize {
        self.surface.backing_size()
    }

    fn set_backing_size(&mut self, size: BackingSize, update_style: bool) {
        self.surface.set_backing_size(size, update_style);
    }

    fn set_clear_color(&mut self, color: Color) {
        self.gl.clear.set(opaque(color));
    }
}

/// Base pass plus an additive, enlarged glow pass for bright geometry.
struct GlBloom {
    gl: Rc<Gl>,
    base: bool,
    bloom: Option<BloomParams>,
    size: Size,
}

impl GlBloom {
    fn new(gl: Rc<Gl>) -> Self {
        Self {
            gl,
            base: false,
            bloom: None,
            size: Size::ZERO,
        }
    }
}

impl Compositor<Scene, PerspectiveCamera> for GlBloom {
    fn add_render_pass(&mut self) {
        self.base = true;
    }

    fn add_bloom_pass(&mut self, params: BloomParams) {
        self.bloom = Some(params);
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let gl = &self.gl;
        let backing = BackingSize::new(
            u32::try_from(gl.context.drawing_buffer_width()).unwrap_or(0),
            u32::try_from(gl.context.drawing_buffer_height()).unwrap_or(0),
        );
        gl.begin(backing);
        if self.base {
            gl.draw(&Draw {
                angle: scene.angle(),
                aspect: camera.aspect,
                scale: 1.0,
                light: scene.light(),
                alpha: 1.0,
            });
        }
        let Some(bloom) = self.bloom else {
            return;
        };
        let excess = scene.light() - bloom.threshold;
        if excess <= 0.0 {
            return;
        }
        // The glow is laid out against the window, not the canvas.
        let aspect = if self.size.height > 0.0 {
            self.size.width / self.size.height
        } else {
            camera.aspect
        };
        let ctx = &gl.context;
        ctx.enable(WebGl2RenderingContext::BLEND);
        ctx.blend_func(WebGl2RenderingContext::ONE, WebGl2RenderingContext::ONE);
        gl.draw(&Draw {
            angle: scene.angle(),
            aspect,
            scale: 1.0 + bloom.radius,
            light: excess * bloom.strength * 0.3,
            alpha: 1.0,
        });
        ctx.disable(WebGl2RenderingContext::BLEND);
    }
}

// -- overlay ----------------------------------------------------------------

/// Text overlay naming the current orientation.
struct LabelOverlay {
    element: HtmlElement,
}

impl OverlayRenderer<Scene, PerspectiveCamera> for LabelOverlay {
    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) {
        let mut degrees = scene.angle().to_degrees() % 360.0;
        if degrees < 0.0 {
            degrees += 360.0;
        }
        self.element
            .set_text_content(Some(&format!("drag to rotate · {degrees:.0}°")));
    }

    fn set_size(&mut self, size: Size) {
        let s = self.element.style();
        let _ = s.set_property("width", &format!("{}px", size.width));
        let _ = s.set_property("height", &format!("{}px", size.height));
    }
}

// -- input ------------------------------------------------------------------

/// Drag state shared between the controller and its DOM listeners.
#[derive(Default)]
struct DragState {
    yaw: Rc<Cell<f64>>,
    velocity: Cell<f64>,
    last_x: Cell<Option<f64>>,
    listener: RefCell<Option<Listener>>,
}

impl DragState {
    fn notify(&self) {
        if let Some(listener) = self.listener.borrow_mut().as_mut() {
            listener();
        }
    }

    fn rotate(&self, delta: f64) {
        self.yaw.set(self.yaw.get() + delta);
        self.notify();
    }
}

type PointerClosure = Closure<dyn FnMut(MouseEvent)>;

/// Horizontal drag rotates the scene; release leaves a damped spin.
struct DragControls {
    canvas: HtmlElement,
    overlay: HtmlElement,
    state: Rc<DragState>,
    damping: bool,
    attached: Option<(HtmlElement, Vec<(&'static str, PointerClosure)>)>,
}

impl DragControls {
    fn new(canvas: HtmlElement, overlay: HtmlElement, yaw: Rc<Cell<f64>>) -> Self {
        Self {
            canvas,
            overlay,
            state: Rc::new(DragState {
                yaw,
                ..DragState::default()
            }),
            damping: false,
            attached: None,
        }
    }

    fn detach(&mut self) {
        if let Some((element, closures)) = self.attached.take() {
            for (event, closure) in &closures {
                let _ = element
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
        }
    }

    fn listeners(&self) -> Vec<(&'static str, PointerClosure)> {
        let down = Rc::clone(&self.state);
        let on_down = Closure::wrap(Box::new(move |e: MouseEvent| {
            down.last_x.set(Some(f64::from(e.client_x())));
            down.velocity.set(0.0);
        }) as Box<dyn FnMut(MouseEvent)>);

        let moved = Rc::clone(&self.state);
        let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
            let Some(last) = moved.last_x.get() else {
                return;
            };
            let x = f64::from(e.client_x());
            moved.last_x.set(Some(x));
            let delta = (x - last) * DRAG_SPEED;
            moved.velocity.set(delta);
            moved.rotate(delta);
        }) as Box<dyn FnMut(MouseEvent)>);

        let up = Rc::clone(&self.state);
        let on_up = Closure::wrap(Box::new(move |_: MouseEvent| {
            up.last_x.set(None);
        }) as Box<dyn FnMut(MouseEvent)>);

        let leave = Rc::clone(&self.state);
        let on_leave = Closure::wrap(Box::new(move |_: MouseEvent| {
            leave.last_x.set(None);
        }) as Box<dyn FnMut(MouseEvent)>);

        Vec::from([
            ("pointerdown", on_down),
            ("pointermove", on_move),
            ("pointerup", on_up),
            ("pointerleave", on_leave),
        ])
    }
}

impl InputController for DragControls {
    fn attach(&mut self, target: InputTarget) {
        self.detach();
        // The overlay sits above the canvas and would swallow its pointer
        // events.
        let (element, overlay_events) = match target {
            InputTarget::Overlay => (self.overlay.clone(), "auto"),
            InputTarget::Canvas => (self.canvas.clone(), "none"),
        };
        let _ = self
            .overlay
            .style()
            .set_property("pointer-events", overlay_events);
        let closures = self.listeners();
        for (event, closure) in &closures {
            let _ =
                element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        self.attached = Some((element, closures));
    }

    // The triangle always turns about its own center.
    fn set_target(&mut self, _target: [f64; 3]) {}

    fn set_damping(&mut self, enabled: bool) {
        self.damping = enabled;
    }

    fn update(&mut self) {
        if !self.damping || self.state.last_x.get().is_some() {
            return;
        }
        let v = self.state.velocity.get() * DAMPING;
        if v.abs() < REST_VELOCITY {
            self.state.velocity.set(0.0);
            return;
        }
        self.state.velocity.set(v);
        self.state.rotate(v);
    }

    fn set_change_listener(&mut self, listener: Option<Listener>) {
        *self.state.listener.borrow_mut() = listener;
    }
}

impl Drop for DragControls {
    fn drop(&mut self) {
        self.detach();
    }
}
