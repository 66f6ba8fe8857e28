use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use scancore::render_interface::{MarkerSnapshot, Theme as SceneTheme};
use scancore::simulation::MarkerKind;
use scancore::FrameReport;
use serde::Deserialize;
use std::time::Duration;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

// Side projection window in world units (x right, y up).
const VIEW_MIN_X: f32 = -21.0;
const VIEW_MAX_X: f32 = 26.0;
const VIEW_MIN_Y: f32 = -8.0;
const VIEW_MAX_Y: f32 = 12.0;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Ship Scanner".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(50)).map(|_| Message::Tick)
}

fn application_theme(state: &Visualizer) -> Theme {
    match state.payload.as_ref().map(|payload| payload.theme) {
        Some(SceneTheme::Light) => Theme::Light,
        _ => Theme::Dark,
    }
}

#[derive(Debug)]
struct Visualizer {
    payload: Option<VisualizationPayload>,
    status: String,
    history: Vec<String>,
    last_count: u64,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    FrameFetched(Result<VisualizationPayload, String>),
    ToggleTheme,
    ThemeToggled(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                payload: None,
                status: "Waiting for the scene...".into(),
                history: Vec::new(),
                last_count: 0,
            },
            Task::perform(fetch_frame(), Message::FrameFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_frame(), Message::FrameFetched),
            Message::FrameFetched(Ok(payload)) => {
                if let Some(frame) = &payload.frame {
                    state.track_detections(frame);
                    state.status = format!(
                        "Tick {} / {} ships / {} markers",
                        frame.tick,
                        frame.objects.len(),
                        frame.markers.len()
                    );
                }
                state.payload = Some(payload);
                Task::none()
            }
            Message::FrameFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::ToggleTheme => Task::perform(post_theme_toggle(), Message::ThemeToggled),
            Message::ThemeToggled(Ok(theme)) => {
                state.push_history(format!("Theme -> {theme}"));
                Task::none()
            }
            Message::ThemeToggled(Err(err)) => {
                state.status = format!("Theme error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let (counter, counter_color, title) = match &state.payload {
            Some(payload) => {
                let cursor = if payload.title_cursor { "|" } else { "" };
                (
                    payload.counter_text.clone(),
                    parse_hex_color(&payload.counter_color),
                    format!("{}{}", payload.title, cursor),
                )
            }
            None => (
                "SHIPS DETECTED: -".to_string(),
                parse_hex_color("#00d4e0"),
                String::new(),
            ),
        };

        let scene = Canvas::new(SceneView {
            frame: state.payload.as_ref().and_then(|payload| payload.frame.clone()),
            accent: counter_color,
        })
        .width(Length::Fill)
        .height(Length::Fixed(420.0));

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let header = row![
            text(counter).size(22).color(counter_color),
            button("Toggle theme")
                .on_press(Message::ToggleTheme)
                .padding(8),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let layout = column![
            text(title).size(20).color(counter_color),
            header,
            scene,
            text(&state.status).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(120.0))).padding(6),
        ]
        .spacing(12)
        .padding(20)
        .width(Length::Fill);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Logs counter increases; a lower count means the simulator restarted.
    fn track_detections(&mut self, frame: &FrameReport) {
        if frame.detections < self.last_count {
            self.push_history(format!("Scene restarted at tick {}", frame.tick));
            self.last_count = frame.detections;
        }
        if frame.detections > self.last_count {
            self.push_history(format!(
                "t={:.1}s detections {}",
                frame.elapsed_ms as f32 / 1000.0,
                frame.detections
            ));
            self.last_count = frame.detections;
        }
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_frame() -> Result<VisualizationPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/frame"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisualizationPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_theme_toggle() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/theme"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        let body = response
            .json::<ThemeReply>()
            .await
            .map_err(|e| e.to_string())?;
        Ok(format!("{:?}", body.theme))
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

fn parse_hex_color(value: &str) -> Color {
    let hex = value.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) if hex.len() == 6 => Color::from_rgb8(r, g, b),
        _ => Color::from_rgb(0.0, 0.83, 0.88),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ThemeReply {
    theme: SceneTheme,
}

#[derive(Debug, Clone, Deserialize)]
struct VisualizationPayload {
    #[serde(default)]
    frame: Option<FrameReport>,
    #[serde(default)]
    counter_text: String,
    #[serde(default)]
    counter_color: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    title_cursor: bool,
    #[serde(default)]
    theme: SceneTheme,
}

/// Side view of the scene: robot eye, scanner beam and cone edges, ships and
/// detection markers projected onto the x/y plane.
#[derive(Clone)]
struct SceneView {
    frame: Option<FrameReport>,
    accent: Color,
}

impl SceneView {
    fn project(bounds: &Rectangle, x: f32, y: f32) -> Point {
        let u = (x - VIEW_MIN_X) / (VIEW_MAX_X - VIEW_MIN_X);
        let v = (y - VIEW_MIN_Y) / (VIEW_MAX_Y - VIEW_MIN_Y);
        Point::new(u * bounds.width, bounds.height - v * bounds.height)
    }

    fn units_to_pixels(bounds: &Rectangle, units: f32) -> f32 {
        units * bounds.width / (VIEW_MAX_X - VIEW_MIN_X)
    }

    fn draw_marker(&self, frame: &mut Frame, bounds: &Rectangle, marker: &MarkerSnapshot) {
        let center = Self::project(bounds, marker.position.x, marker.position.y);
        let radius = Self::units_to_pixels(bounds, 0.5 * marker.scale).max(2.0);
        let circle = Path::new(|builder| builder.circle(center, radius));
        match marker.kind {
            MarkerKind::Pulse => {
                frame.fill(&circle, Color::from_rgba(0.0, 1.0, 0.0, marker.opacity))
            }
            MarkerKind::Hold => frame.stroke(
                &circle,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgba(0.0, 1.0, 0.0, marker.opacity)),
            ),
        }
    }
}

impl canvas::Program<Message> for SceneView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.06),
        );

        let Some(report) = &self.frame else {
            return vec![frame.into_geometry()];
        };

        let scanner = &report.scanner;
        let eye = Self::project(&bounds, scanner.origin.x, scanner.origin.y);
        let heading = scanner.direction.y.atan2(scanner.direction.x);
        let beam_end = |angle: f32| {
            Self::project(
                &bounds,
                scanner.origin.x + scanner.max_range * angle.cos(),
                scanner.origin.y + scanner.max_range * angle.sin(),
            )
        };

        let cone = Path::new(|builder| {
            builder.move_to(eye);
            builder.line_to(beam_end(heading - scanner.half_angle_rad));
            builder.move_to(eye);
            builder.line_to(beam_end(heading + scanner.half_angle_rad));
        });
        frame.stroke(
            &cone,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgba(1.0, 0.0, 0.0, 0.35)),
        );
        let beam = Path::line(eye, beam_end(heading));
        frame.stroke(
            &beam,
            Stroke::default()
                .with_width(2.0)
                .with_color(Color::from_rgba(1.0, 0.0, 0.0, 0.8)),
        );

        let robot = Path::new(|builder| builder.circle(eye, 6.0));
        frame.fill(&robot, Color::from_rgb(0.23, 0.23, 0.42));
        let iris = Path::new(|builder| builder.circle(eye, 3.0));
        frame.fill(&iris, self.accent);

        for ship in &report.objects {
            let nose = Self::project(&bounds, ship.position.x - 0.75, ship.position.y);
            let top = Self::project(&bounds, ship.position.x + 0.75, ship.position.y + 0.3);
            let bottom = Self::project(&bounds, ship.position.x + 0.75, ship.position.y - 0.3);
            let hull = Path::new(|builder| {
                builder.move_to(nose);
                builder.line_to(top);
                builder.line_to(bottom);
                builder.close();
            });
            let color = if ship.detected {
                Color::from_rgb(0.2, 1.0, 0.4)
            } else {
                Color::from_rgba(0.35, 0.31, 1.0, 0.7)
            };
            frame.fill(&hull, color);
        }

        for marker in &report.markers {
            self.draw_marker(&mut frame, &bounds, marker);
        }

        vec![frame.into_geometry()]
    }
}
