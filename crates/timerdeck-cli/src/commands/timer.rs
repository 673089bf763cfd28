use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Subcommand;
use timerdeck_core::{
    AlarmSink, AlertCoordinator, Config, ConsoleBell, ConsoleNotifier, CountdownScheduler,
    DocumentStore, MemoryStore, Notifier, NullAlarm, SilentNotifier, SyncAdapter, TimeLeft,
    TimerDoc, TimerPhase, TimerRegistry,
};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run countdown timers in the foreground until they all finish
    Run {
        /// Timer spec, repeatable: TITLE=H:M:S (title optional)
        #[arg(long = "timer", value_name = "TITLE=H:M:S", required = true)]
        timers: Vec<String>,
        /// Disable the terminal-bell alarm
        #[arg(long)]
        no_ring: bool,
        /// Print each state line as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show two clients sharing one store through the snapshot feed
    Demo,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    match action {
        TimerAction::Run { timers, no_ring, json } => rt.block_on(run_timers(timers, no_ring, json)),
        TimerAction::Demo => rt.block_on(demo()),
    }
}

/// Parse `TITLE=H:M:S` (or bare `H:M:S`, which gets a placeholder title).
/// Out-of-range units are clamped, not rejected.
fn parse_spec(spec: &str) -> Result<TimerDoc, String> {
    let (title, clock) = match spec.split_once('=') {
        Some((title, clock)) => (Some(title), clock),
        None => (None, spec),
    };
    let units: Vec<i64> = clock
        .split(':')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("invalid timer spec '{spec}', expected TITLE=H:M:S"))?;
    let [h, m, s] = units[..] else {
        return Err(format!("invalid timer spec '{spec}', expected TITLE=H:M:S"));
    };
    let left = TimeLeft::new(h, m, s);
    Ok(match title {
        Some(title) => TimerDoc::new(title, left),
        None => {
            let mut doc = TimerDoc::placeholder();
            doc.left = left;
            doc
        }
    })
}

fn phase_label(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Idle => "idle",
        TimerPhase::Running => "running",
        TimerPhase::Finished => "finished",
    }
}

async fn run_timers(
    specs: Vec<String>,
    no_ring: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load().unwrap_or_default();
    let docs = specs
        .iter()
        .map(|s| parse_spec(s))
        .collect::<Result<Vec<_>, _>>()?;

    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(Mutex::new(TimerRegistry::new()));
    let adapter = Arc::new(SyncAdapter::new(
        Arc::clone(&registry),
        Arc::clone(&store) as Arc<dyn DocumentStore>,
    ));
    let notifier: Arc<dyn Notifier> = if config.alerts.enabled {
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(SilentNotifier)
    };
    let alarm: Arc<dyn AlarmSink> = if no_ring || !config.alerts.bell {
        Arc::new(NullAlarm)
    } else {
        Arc::new(ConsoleBell)
    };
    let alerts = Arc::new(AlertCoordinator::new(notifier, alarm));
    let scheduler = CountdownScheduler::new(
        Arc::clone(&registry),
        Arc::clone(&adapter),
        Arc::clone(&alerts),
    );

    tokio::spawn(Arc::clone(&adapter).run());

    let mut ids = Vec::new();
    for doc in docs {
        ids.push(adapter.add_timer_with(doc).await?);
    }

    // Wait for the store to echo the new documents back.
    for _ in 0..50 {
        if registry.lock().unwrap().len() == ids.len() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    for id in &ids {
        scheduler.start(id).await;
    }

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let (lines, all_done) = {
            let reg = registry.lock().unwrap();
            let lines: Vec<String> = reg
                .list()
                .iter()
                .map(|t| {
                    if json {
                        serde_json::to_string(t).unwrap_or_default()
                    } else {
                        format!(
                            "{:<24} {}  {}",
                            t.doc.title,
                            t.doc.left,
                            phase_label(t.doc.phase())
                        )
                    }
                })
                .collect();
            let all_done = !reg.is_empty() && reg.list().iter().all(|t| t.doc.finished);
            (lines, all_done)
        };
        for line in lines {
            println!("{line}");
        }
        if all_done {
            break;
        }
    }

    println!("all timers finished");
    alerts.stop();
    scheduler.stop_all();
    Ok(())
}

/// Two clients on one store: a write from either side reaches the other
/// through the full-snapshot change stream.
async fn demo() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let client = |store: Arc<MemoryStore>| {
        let registry = Arc::new(Mutex::new(TimerRegistry::new()));
        let adapter = Arc::new(SyncAdapter::new(
            Arc::clone(&registry),
            store as Arc<dyn DocumentStore>,
        ));
        (registry, adapter)
    };
    let (_alice_view, alice) = client(Arc::clone(&store));
    let (bob_view, bob) = client(store);
    tokio::spawn(Arc::clone(&alice).run());
    tokio::spawn(Arc::clone(&bob).run());
    settle().await;

    let id = alice
        .add_timer_with(TimerDoc::new("shared kitchen timer", TimeLeft::new(0, 10, 0)))
        .await?;
    settle().await;
    let seen = bob_view
        .lock()
        .unwrap()
        .get(&id)
        .map(|t| t.doc.title.clone())
        .unwrap_or_default();
    println!("bob sees new timer: {seen}");

    alice.set_title(&id, "pasta").await;
    settle().await;
    let seen = bob_view
        .lock()
        .unwrap()
        .get(&id)
        .map(|t| t.doc.title.clone())
        .unwrap_or_default();
    println!("bob sees rename: {seen}");

    alice.remove_timer(&id).await;
    settle().await;
    println!("bob's count after delete: {}", bob_view.lock().unwrap().len());
    Ok(())
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
