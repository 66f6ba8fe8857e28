use anyhow::Context;
use clap::Parser;
use generator::preset::ScenePreset;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use log::info;
use scancore::render_interface::{CounterOverlay, Typewriter};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{format_elapsed, Runner};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Ship-scanner scene driver")]
struct Args {
    /// Run the configured number of ticks on a virtual clock and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ScenePreset::Cone)]
    preset: ScenePreset,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Run the scene in real time and serve frames to the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.preset, args.seed, args.ticks)
    };

    if args.offline {
        let runner = Runner::new(workflow_config.clone());
        let mut overlay = CounterOverlay::new(workflow_config.theme);
        let result = runner.execute(&mut overlay)?;

        println!(
            "Offline run -> ticks {}, elapsed {}, detections {}, boundary recycles {}, expirations {}, respawns {}",
            result.ticks,
            format_elapsed(result.elapsed_ms),
            result.detection_count,
            result.metrics.boundary_recycles,
            result.metrics.expirations,
            result.metrics.respawns
        );
        if let Some(frame) = &result.final_frame {
            println!(
                "Final frame -> tick {}, {} ships, {} markers, \"{}\"",
                frame.tick,
                frame.objects.len(),
                frame.markers.len(),
                frame.label
            );
        }

        let report = format!(
            "seed={} ticks={} elapsed_ms={} detections={} boundary_recycles={} expirations={} respawns={}\n",
            workflow_config.seed,
            result.ticks,
            result.elapsed_ms,
            result.detection_count,
            result.metrics.boundary_recycles,
            result.metrics.expirations,
            result.metrics.respawns
        );
        let report_path = PathBuf::from("tools/data/offline_detection.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
        info!("offline report appended to {}", report_path.display());
    }

    if args.serve {
        // Live scene gets its own recorder.
        let runner = Runner::new(workflow_config.clone());
        let mut gui_bridge = GuiBridge::new(
            runner.metrics(),
            Typewriter::new(
                workflow_config.title.clone(),
                workflow_config.title_char_interval(),
            ),
            workflow_config.theme,
        );
        let _server = gui_bridge.serve(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the frame loop")?;
        let result = runtime.block_on(async {
            let shutdown = async {
                if let Err(err) = signal::ctrl_c().await {
                    log::warn!("awaiting Ctrl+C failed: {}", err);
                }
            };
            runner.run_realtime(&mut gui_bridge, shutdown).await
        })?;
        println!(
            "Scene stopped after {} ticks ({}), detections {}",
            result.ticks,
            format_elapsed(result.elapsed_ms),
            result.detection_count
        );
    }

    Ok(())
}
