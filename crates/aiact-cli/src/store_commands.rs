// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use aiact_engine::SystemSnapshot;
use aiact_model::TenantContext;
use aiact_server::{ComplianceStore, SqliteStore};
use serde_json::json;

use crate::inputs::read_json;
use crate::output::emit_ok;
use crate::{CliError, OutputMode};

pub(crate) fn run_seed(db: &Path, snapshots: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let snapshots: Vec<SystemSnapshot> = read_json(snapshots, "read snapshots")?;
    let store = SqliteStore::open(db).map_err(CliError::dependency)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(CliError::internal)?;
    runtime.block_on(async {
        for snapshot in &snapshots {
            // Each snapshot is written on behalf of the organization it names.
            let ctx = TenantContext::new(snapshot.organization.id.clone());
            store
                .put_snapshot(&ctx, snapshot)
                .await
                .map_err(|e| CliError::dependency(e).with_detail("system_id", snapshot.system.id.as_str()))?;
            tracing::info!(system_id = %snapshot.system.id, "snapshot stored");
        }
        Ok::<(), CliError>(())
    })?;
    emit_ok(
        output_mode,
        json!({
            "command": "store seed",
            "db": db,
            "systems": snapshots.len(),
        }),
    )
}
