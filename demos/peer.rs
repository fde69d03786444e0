//! Command-line discovery viewer.
//!
//! Listens for peers of the given application on the given port and prints
//! the discovered set whenever membership or user data changes.

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use lancast::{same_list, Endpoint, Peer, PeerParameters};
use tracing::Level;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

fn usage(program: &str) {
    println!("Usage: {program} application_id port");
    println!("  application_id - integer id of application to discover");
    println!("  port - port used by application");
}

fn main() -> ExitCode {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let filter_layer = filter::LevelFilter::from_level(Level::INFO);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("peer");

    if args.len() <= 1 {
        eprintln!("expecting application_id and port");
        usage(program);
        return ExitCode::FAILURE;
    }
    if args.len() <= 2 {
        eprintln!("expecting port");
        usage(program);
        return ExitCode::FAILURE;
    }

    let Ok(application_id) = args[1].parse::<u32>() else {
        eprintln!("invalid application_id: {}", args[1]);
        usage(program);
        return ExitCode::FAILURE;
    };
    let Ok(port) = args[2].parse::<u16>() else {
        eprintln!("invalid port: {}", args[2]);
        usage(program);
        return ExitCode::FAILURE;
    };

    let parameters = PeerParameters {
        application_id,
        port,
        can_discover: true,
        ..PeerParameters::default()
    };

    let mut peer = Peer::new();
    if peer.start(parameters.clone(), Vec::new()).is_err() {
        return ExitCode::FAILURE;
    }

    let mut shown: Vec<lancast::DiscoveredPeer> = Vec::new();
    let mut shown_user_data: BTreeMap<Endpoint, Vec<u8>> = BTreeMap::new();

    loop {
        let discovered = peer.list_discovered();

        let membership_changed = !same_list(parameters.same_peer_mode, &shown, &discovered);
        let user_data_changed = discovered.iter().any(|entry| {
            shown_user_data
                .get(&entry.endpoint)
                .map(|data| data != &entry.user_data)
                .unwrap_or(true)
        });

        if membership_changed || user_data_changed {
            shown = discovered;
            shown_user_data = shown
                .iter()
                .map(|entry| (entry.endpoint, entry.user_data.clone()))
                .collect();

            println!("Discovered peers: {}", shown.len());
            for entry in &shown {
                println!(
                    " - {}, {}",
                    entry.endpoint,
                    String::from_utf8_lossy(&entry.user_data)
                );
            }
        }

        thread::sleep(Duration::from_millis(500));
    }
}
