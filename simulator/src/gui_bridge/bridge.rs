use crate::gui_bridge::model::VisualizationModel;
use log::{info, warn};
use scancore::render_interface::{CounterOverlay, Theme, Typewriter};
use scancore::telemetry::MetricsRecorder;
use scancore::{DisplayAdapter, FrameReport};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
    time::Duration,
};
use tokio::runtime::Builder;
use warp::Filter;

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

fn toggle_theme(theme: &RwLock<Theme>) -> Theme {
    match theme.write() {
        Ok(mut guard) => {
            *guard = guard.toggled();
            *guard
        }
        Err(_) => Theme::default(),
    }
}

/// Display adapter that keeps the latest frame for the render surface and
/// serves it over HTTP.
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
    theme: Arc<RwLock<Theme>>,
    metrics: Arc<MetricsRecorder>,
    overlay: CounterOverlay,
    typewriter: Typewriter,
}

impl GuiBridge {
    pub fn new(metrics: Arc<MetricsRecorder>, typewriter: Typewriter, theme: Theme) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            theme: Arc::new(RwLock::new(theme)),
            metrics,
            overlay: CounterOverlay::new(theme),
            typewriter,
        }
    }

    /// Starts the HTTP endpoint on its own thread and runtime.
    pub fn serve(&self, address: SocketAddr) -> thread::JoinHandle<()> {
        let state = self.state.clone();
        let theme = self.theme.clone();
        let metrics = self.metrics.clone();
        let state_filter = warp::any().map(move || state.clone());
        let theme_filter = warp::any().map(move || theme.clone());
        let metrics_filter = warp::any().map(move || metrics.clone());

        let frame_route = warp::path("frame")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<VisualizationModel>>| {
                let reply = match state.read() {
                    Ok(guard) => warp::reply::json(&*guard),
                    Err(_) => warp::reply::json(&VisualizationModel::default()),
                };
                reply
            });

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(metrics_filter)
            .map(|metrics: Arc<MetricsRecorder>| warp::reply::json(&metrics.snapshot()));

        let theme_route = warp::path("theme")
            .and(warp::path::end())
            .and(warp::post())
            .and(theme_filter)
            .map(|theme: Arc<RwLock<Theme>>| {
                let next = toggle_theme(&theme);
                info!("[GUI] theme switched to {:?}", next);
                warp::reply::json(&json!({ "theme": next }))
            });

        thread::spawn(move || {
            let routes = frame_route.or(metrics_route).or(theme_route);
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(async move {
                    warp::serve(routes).run(address).await;
                }),
                Err(err) => warn!("failed to build bridge runtime: {}", err),
            }
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme.read().map(|guard| *guard).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn toggle_theme(&self) -> Theme {
        toggle_theme(&self.theme)
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl DisplayAdapter for GuiBridge {
    fn present(&mut self, frame: &FrameReport) {
        let theme = self.theme();
        self.overlay.set_theme(theme);
        self.overlay.present(frame);
        let title = self
            .typewriter
            .sample(Duration::from_millis(frame.elapsed_ms));

        let model = VisualizationModel {
            frame: Some(frame.clone()),
            counter_text: self.overlay.text().to_string(),
            counter_color: self.overlay.color().to_string(),
            title: title.visible.to_string(),
            title_cursor: title.cursor,
            theme,
        };
        if let Ok(mut guard) = self.state.write() {
            *guard = model;
        }
    }
}
