use chrono::Utc;
use dispatch_core::entities::Vehicle;
use dispatch_core::enums::VehicleStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: Option<&str>,
    status: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status: VehicleStatus = parse_enum(status, "status")?;

    let vehicle = match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => {
            let vehicle = Vehicle {
                id: id.to_string(),
                status,
                updated_at: Utc::now(),
            };
            ctx.db().insert_vehicle(&vehicle).await?;
            vehicle
        }
        None => ctx.db().create_vehicle(status).await?,
    };
    output(&vehicle, flags.format)
}
