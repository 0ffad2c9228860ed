//! Kinetoscope entry point
//!
//! In the browser this binds one page's model to its canvas and controls.
//! Natively it plays the built-in pages headless at a fixed 60 Hz.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement};

    use kinetoscope::hud::{self, ReadoutLine};
    use kinetoscope::quiz::Quiz;
    use kinetoscope::renderer::{CanvasSurface, Layout, render_adiabatic, render_scenario};
    use kinetoscope::sim::{
        Driver, DriverState, FrameHandle, FrameOutcome, FrameScheduler, GasExplorer, Level,
        PageModel, Projectile, Scenario, Trail,
    };
    use kinetoscope::{PageConfig, ScenarioConfig, SpeedPreset};

    /// requestAnimationFrame, calling back into the page that owns it
    struct RafScheduler {
        page: Weak<RefCell<Page>>,
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            let page = self.page.clone();
            let closure = Closure::once(move |timestamp: f64| {
                if let Some(page) = page.upgrade() {
                    page.borrow_mut().on_frame(timestamp);
                }
            });
            let handle = match web_sys::window()
                .map(|w| w.request_animation_frame(closure.as_ref().unchecked_ref()))
            {
                Some(Ok(id)) => id,
                _ => {
                    log::warn!("requestAnimationFrame unavailable");
                    0
                }
            };
            closure.forget();
            FrameHandle(handle)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0);
            }
        }
    }

    enum Content {
        Animated {
            driver: Driver<Scenario, RafScheduler>,
            trails: bool,
        },
        Adiabatic(GasExplorer),
    }

    struct Page {
        document: Document,
        canvas: HtmlCanvasElement,
        surface: CanvasSurface,
        layout: Layout,
        content: Content,
        quiz: Option<Quiz>,
    }

    impl Page {
        fn on_frame(&mut self, timestamp: f64) {
            let outcome = match &mut self.content {
                Content::Animated { driver, .. } => driver.on_frame(timestamp),
                Content::Adiabatic { .. } => return,
            };
            if outcome == FrameOutcome::Ignored {
                return;
            }
            self.render();
            if outcome == FrameOutcome::Finished {
                self.sync_play_button();
            }
        }

        fn render(&mut self) {
            let lines = match &self.content {
                Content::Animated { driver, trails } => {
                    let hidden = Trail::default();
                    let trail = if *trails { driver.trail() } else { &hidden };
                    render_scenario(
                        driver.stepper(),
                        driver.state(),
                        trail,
                        &self.layout,
                        &mut self.surface,
                    );
                    hud::readout(driver.stepper(), driver.state())
                }
                Content::Adiabatic(gas) => {
                    render_adiabatic(
                        gas.model(),
                        gas.volume(),
                        gas.guess(),
                        &self.layout,
                        &mut self.surface,
                    );
                    hud::gas_readout(&gas.sample())
                }
            };
            sync_readouts(&self.document, &lines);
        }

        fn sync_play_button(&self) {
            let Content::Animated { driver, .. } = &self.content else {
                return;
            };
            if let Some(btn) = self.document.get_element_by_id("play-btn") {
                let label = match driver.driver_state() {
                    DriverState::Playing => "Pause",
                    DriverState::Paused => "Resume",
                    DriverState::Stopped => "Play",
                };
                btn.set_text_content(Some(label));
            }
        }

        fn toggle(&mut self) {
            if let Content::Animated { driver, .. } = &mut self.content {
                let state = driver.toggle(now());
                log::debug!("play button -> {:?}", state);
            }
            self.sync_play_button();
        }

        fn pause(&mut self) {
            if let Content::Animated { driver, .. } = &mut self.content {
                if driver.pause() {
                    log::info!("Auto-paused (tab hidden)");
                }
            }
            self.sync_play_button();
        }

        fn reset(&mut self) {
            if let Content::Animated { driver, .. } = &mut self.content {
                driver.reset();
            }
            self.render();
            self.sync_play_button();
        }

        fn set_speed(&mut self, preset: SpeedPreset) {
            if let Content::Animated { driver, .. } = &mut self.content {
                if let Err(e) = driver.set_speed(preset.multiplier()) {
                    log::warn!("{}", e);
                }
            }
        }

        /// Rebuild the projectile for a new launch angle
        fn set_angle(&mut self, degrees: f64) {
            let Content::Animated { driver, .. } = &mut self.content else {
                return;
            };
            let Scenario::Projectile(current) = *driver.stepper() else {
                return;
            };
            match Projectile::from_degrees(current.speed(), degrees, current.gravity()) {
                Ok(model) => driver.rederive(Scenario::Projectile(model)),
                Err(e) => {
                    log::warn!("ignoring angle {}: {}", degrees, e);
                    return;
                }
            }
            self.render();
        }

        fn set_volume(&mut self, value: f64) {
            if let Content::Adiabatic(gas) = &mut self.content {
                gas.set_volume(value);
            }
            self.render();
        }

        fn next_level(&mut self) {
            let Content::Adiabatic(gas) = &mut self.content else {
                return;
            };
            if gas.next_level() {
                log::info!("{}", gas.level().title());
            }
            self.sync_level();
        }

        /// Show the controls for the current level
        fn sync_level(&self) {
            let Content::Adiabatic(gas) = &self.content else {
                return;
            };
            let level = gas.level();
            if let Some(el) = self.document.get_element_by_id("level-indicator") {
                el.set_text_content(Some(level.title()));
            }
            for (id, shown) in [
                ("level-1-content", level == Level::Explore),
                ("level-2-content", level == Level::Guess),
            ] {
                if let Some(el) = self.document.get_element_by_id(id) {
                    let _ = el.class_list().toggle_with_force("hidden", !shown);
                }
            }
        }

        /// Returns the feedback text for the γ guess box
        fn check_gamma(&mut self, raw: &str) -> Option<&'static str> {
            let Content::Adiabatic(gas) = &mut self.content else {
                return None;
            };
            let value = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
            let verdict = gas.submit_guess(value)?;
            self.render();
            Some(verdict.feedback())
        }

        fn resize(&mut self) {
            let width = self.canvas.client_width().max(1) as u32;
            let height = self.canvas.client_height().max(1) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.surface.resize(width, height);
            self.layout = Layout::new(width as f32, height as f32);
            self.render();
        }
    }

    /// Same clock as requestAnimationFrame timestamps
    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn sync_readouts(document: &Document, lines: &[ReadoutLine]) {
        for line in lines {
            let selector = format!("[data-readout=\"{}\"]", line.key);
            if let Ok(Some(el)) = document.query_selector(&selector) {
                el.set_text_content(Some(&line.value));
            }
        }
    }

    fn elements(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn on_click<F>(target: &Element, handler: F)
    where
        F: FnMut(web_sys::MouseEvent) + 'static,
    {
        let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
        let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_input<F>(target: &Element, event: &str, handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn read_config(canvas: &HtmlCanvasElement) -> Result<PageConfig, JsValue> {
        match canvas.get_attribute("data-config") {
            Some(json) => PageConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string())),
            None => {
                log::warn!("canvas has no data-config, showing the default page");
                let (_, scenario) = ScenarioConfig::presets()
                    .into_iter()
                    .next()
                    .ok_or_else(|| JsValue::from_str("no built-in pages"))?;
                Ok(PageConfig::new(scenario))
            }
        }
    }

    fn build_quiz(document: &Document, seed: Option<u64>) -> Option<Quiz> {
        let options = elements(document, ".quiz-option");
        if options.is_empty() {
            return None;
        }
        let markup: Vec<(String, Option<String>)> = options
            .iter()
            .map(|el| {
                (
                    el.text_content().unwrap_or_default(),
                    el.get_attribute("data-answer"),
                )
            })
            .collect();
        let mut quiz = Quiz::from_answers(
            markup
                .iter()
                .map(|(label, answer)| (label.as_str(), answer.as_deref())),
        );
        if let Some(seed) = seed {
            quiz.shuffle(seed);
            for (el, option) in options.iter().zip(quiz.options()) {
                el.set_text_content(Some(&option.label));
                let marked = match option.answer_attribute() {
                    Some(marker) => el.set_attribute("data-answer", marker),
                    None => el.remove_attribute("data-answer"),
                };
                if marked.is_err() {
                    log::warn!("could not update data-answer on quiz option");
                }
            }
        }
        Some(quiz)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("stage")
            .ok_or_else(|| JsValue::from_str("no #stage canvas"))?
            .dyn_into()?;

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = read_config(&canvas)?;
        let model = config
            .scenario
            .build()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let surface = CanvasSurface::new(&canvas)
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?;
        let quiz = build_quiz(&document, config.quiz_seed);

        let settings = config.settings.clone();
        let page = Rc::new_cyclic(|weak: &Weak<RefCell<Page>>| {
            let content = match model {
                PageModel::Animated(scenario) => {
                    log::info!("Loading {} page", scenario.name());
                    let mut driver = Driver::with_trail(
                        scenario,
                        RafScheduler { page: weak.clone() },
                        Trail::new(settings.trail_length),
                    );
                    if let Err(e) = driver.set_speed(settings.speed.multiplier()) {
                        log::warn!("{}", e);
                    }
                    Content::Animated {
                        driver,
                        trails: settings.effective_trails(),
                    }
                }
                PageModel::Adiabatic(model) => {
                    log::info!("Loading adiabatic page");
                    Content::Adiabatic(GasExplorer::new(model))
                }
            };
            RefCell::new(Page {
                document: document.clone(),
                canvas: canvas.clone(),
                surface,
                layout: Layout::new(width as f32, height as f32),
                content,
                quiz,
            })
        });

        setup_playback(&document, &page, settings.speed);
        setup_sliders(&document, &page);
        setup_quiz(&document, &page);
        setup_auto_pause(&window, &document, &page)?;

        {
            let mut p = page.borrow_mut();
            p.render();
            p.sync_play_button();
            p.sync_level();
        }
        log::info!("Kinetoscope running!");
        Ok(())
    }

    fn setup_playback(document: &Document, page: &Rc<RefCell<Page>>, initial: SpeedPreset) {
        if let Some(btn) = document.get_element_by_id("play-btn") {
            let page = page.clone();
            on_click(&btn, move |_| page.borrow_mut().toggle());
        }
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let page = page.clone();
            on_click(&btn, move |_| page.borrow_mut().reset());
        }

        let buttons = elements(document, "[data-speed]");
        for btn in &buttons {
            let Some(preset) = btn
                .get_attribute("data-speed")
                .as_deref()
                .and_then(SpeedPreset::from_str)
            else {
                log::warn!("unrecognised data-speed button");
                continue;
            };
            btn.set_text_content(Some(preset.as_str()));
            if preset == initial {
                let _ = btn.class_list().add_1("active");
            }
            let page = page.clone();
            let group = buttons.clone();
            let this = btn.clone();
            on_click(btn, move |_| {
                page.borrow_mut().set_speed(preset);
                for other in &group {
                    let _ = other.class_list().remove_1("active");
                }
                let _ = this.class_list().add_1("active");
            });
        }
    }

    fn setup_sliders(document: &Document, page: &Rc<RefCell<Page>>) {
        if let Some(el) = document.get_element_by_id("angle-slider") {
            let page = page.clone();
            let input = el.clone();
            on_input(&el, "input", move |_| {
                if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
                    page.borrow_mut().set_angle(input.value_as_number());
                }
            });
        }
        if let Some(el) = document.get_element_by_id("volume-slider") {
            let page = page.clone();
            let input = el.clone();
            on_input(&el, "input", move |_| {
                if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
                    page.borrow_mut().set_volume(input.value_as_number());
                }
            });
        }
        if let Some(btn) = document.get_element_by_id("next-level-btn") {
            let page = page.clone();
            on_click(&btn, move |_| page.borrow_mut().next_level());
        }
        if let Some(el) = document.get_element_by_id("gamma-input") {
            let page = page.clone();
            let input = el.clone();
            let document = document.clone();
            on_input(&el, "change", move |_| {
                let Some(input) = input.dyn_ref::<HtmlInputElement>() else {
                    return;
                };
                let feedback = page.borrow_mut().check_gamma(&input.value());
                if let (Some(text), Some(out)) =
                    (feedback, document.get_element_by_id("gamma-feedback"))
                {
                    out.set_text_content(Some(text));
                }
            });
        }
    }

    fn setup_quiz(document: &Document, page: &Rc<RefCell<Page>>) {
        let options = elements(document, ".quiz-option");
        for (index, el) in options.iter().enumerate() {
            let page = page.clone();
            let group = options.clone();
            let document = document.clone();
            on_click(el, move |_| {
                let outcome = {
                    let mut p = page.borrow_mut();
                    let Some(quiz) = p.quiz.as_mut() else {
                        return;
                    };
                    quiz.choose(index)
                };
                let Some(outcome) = outcome else {
                    return;
                };
                for option in &group {
                    let _ = option.class_list().add_1("locked");
                }
                if let Some(chosen) = group.get(outcome.chosen) {
                    let class = if outcome.is_correct { "correct" } else { "incorrect" };
                    let _ = chosen.class_list().add_1(class);
                }
                if let Some(right) = outcome.correct_index.and_then(|i| group.get(i)) {
                    let _ = right.class_list().add_1("correct");
                }
                if let Some(out) = document.get_element_by_id("quiz-feedback") {
                    out.set_text_content(Some(outcome.feedback));
                }
            });
        }
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        page: &Rc<RefCell<Page>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let page = page.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    page.borrow_mut().pause();
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Resize only recomputes the layout
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                page.borrow_mut().resize();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use log::{debug, info};

    use kinetoscope::hud;
    use kinetoscope::renderer::{DrawList, Layout, render_adiabatic, render_scenario};
    use kinetoscope::sim::thermo::{MAX_VOLUME, MIN_VOLUME};
    use kinetoscope::sim::{
        Driver, GasExplorer, ManualScheduler, PageModel, Trail, run_fixed_cadence,
    };
    use kinetoscope::{PageConfig, Result};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Pages that never finish on their own (orbits) stop here
    const MAX_FRAMES: usize = 60 * 30;
    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    pub fn run(name: &str, config: &PageConfig) -> Result<()> {
        let layout = Layout::new(WIDTH, HEIGHT);
        let mut surface = DrawList::new(WIDTH, HEIGHT);

        match config.scenario.build()? {
            PageModel::Animated(scenario) => {
                let mut driver = Driver::with_trail(
                    scenario,
                    ManualScheduler::new(),
                    Trail::new(config.settings.trail_length),
                );
                driver.set_speed(config.settings.speed.multiplier())?;
                debug!("{}: playing at {}", name, config.settings.speed.as_str());
                driver.play(0.0);
                let frames = run_fixed_cadence(&mut driver, 0.0, FRAME_MS, MAX_FRAMES);

                if driver.is_finished() {
                    info!(
                        "{}: finished after {} frames at t={:.3}s",
                        name,
                        frames,
                        driver.elapsed()
                    );
                } else {
                    info!(
                        "{}: still running after {} frames (t={:.2}s)",
                        name,
                        frames,
                        driver.elapsed()
                    );
                }
                for line in hud::readout(driver.stepper(), driver.state()) {
                    info!("  {:<24} {}", line.label, line.value);
                }

                render_scenario(
                    driver.stepper(),
                    driver.state(),
                    driver.trail(),
                    &layout,
                    &mut surface,
                );
            }
            PageModel::Adiabatic(model) => {
                let mut gas = GasExplorer::new(model);
                for volume in [MIN_VOLUME, model.initial_volume(), MAX_VOLUME] {
                    let sample = gas.set_volume(volume);
                    let lines = hud::gas_readout(&sample);
                    let text: Vec<String> = lines
                        .iter()
                        .map(|l| format!("{} {}", l.label, l.value))
                        .collect();
                    info!("{}: {} (tint {:.0})", name, text.join(", "), sample.tint);
                }
                gas.set_volume(model.initial_volume());
                gas.next_level();
                let monatomic = 5.0 / 3.0;
                if let Some(verdict) = gas.submit_guess(monatomic) {
                    info!(
                        "{}: {}, guessing γ={:.2} -> {}",
                        name,
                        gas.level().title(),
                        monatomic,
                        verdict.feedback()
                    );
                }
                render_adiabatic(gas.model(), gas.volume(), gas.guess(), &layout, &mut surface);
            }
        }
        debug!("{}: last frame is {} draw commands", name, surface.len());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_page::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use kinetoscope::{PageConfig, ScenarioConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Kinetoscope (native) starting...");

    // An optional argument names a page config JSON file to run instead
    // of the built-in pages
    let pages: Vec<(String, PageConfig)> = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| PageConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => vec![(path, config)],
                Err(e) => {
                    log::error!("could not load {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => ScenarioConfig::presets()
            .into_iter()
            .map(|(name, scenario)| (name.to_owned(), PageConfig::new(scenario)))
            .collect(),
    };

    for (name, config) in &pages {
        if let Err(e) = headless::run(name, config) {
            log::error!("{}: {}", name, e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
