//! `saveas probe` – classify a simulated host.

use std::sync::Arc;

use anyhow::Result;
use saveas_core::host::{HostProfile, RecordingHost};
use saveas_core::transport::ScriptedTransport;
use saveas_core::Saver;

pub fn run_probe(profile: HostProfile, json: bool) -> Result<()> {
    let saver = Saver::new(
        Arc::new(RecordingHost::new(profile)),
        Arc::new(ScriptedTransport::new()),
    );
    let caps = saver.capabilities();
    let strategy = saver.strategy();

    if json {
        let out = serde_json::json!({ "capabilities": caps, "strategy": strategy });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if let serde_json::Value::Object(fields) = serde_json::to_value(caps)? {
        for (name, value) in fields {
            println!("{:<26} {}", name, value);
        }
    }
    println!("{:<26} {}", "strategy", strategy);
    Ok(())
}
