use std::{fs::File, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use scalepads::app::{App, AppEvent, Flow};
use scalepads::config::Config;
use scalepads::device::{self, ConnectionResult, MidiDriver, MidirDriver};
use scalepads::{input, ui};

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Light up the pads of a MIDI controller with the notes of a scale.
#[derive(Parser, Debug)]
#[command(name = "scalepads")]
struct Args {
    /// YAML config file (device, channel, pad range, colors, scales)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output port name, overrides the config file
    #[arg(short, long)]
    device: Option<String>,

    /// Zero-indexed MIDI channel, overrides the config file
    #[arg(long)]
    channel: Option<u8>,

    /// Print the available MIDI output ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Log file (RUST_LOG controls the level)
    #[arg(long, default_value = "scalepads.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to a file so they never interfere with the TUI display.
    if let Ok(file) = File::create(&args.log_file) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }

    if args.list_ports {
        let driver = MidirDriver::new()?;
        for name in driver.output_port_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(device) = args.device {
        config.device_name = device;
    }
    if let Some(channel) = args.channel {
        config.channel = channel;
    }
    let settings = config.validate().context("Invalid configuration")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    let result = start(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    app.shutdown();
    if let Err(e) = result { eprintln!("Error: {:?}", e); }
    Ok(())
}

fn start(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let (tx, rx) = flume::unbounded();

    let device_name = app.settings().device_name.clone();
    device::spawn_connect(
        move || -> ConnectionResult { device::open(MidirDriver::new()?, &device_name) },
        tx.clone(),
    )
    .context("Failed to start MIDI connect thread")?;
    app.begin_connect();

    input::spawn_reader(tx).context("Failed to start input thread")?;

    run(terminal, app, &rx)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &flume::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match events.recv_timeout(REDRAW_INTERVAL) {
            Ok(event) => {
                if app.handle(event) == Flow::Quit { break; }
            }
            Err(flume::RecvTimeoutError::Timeout) => {}
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}
