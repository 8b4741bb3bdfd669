use crate::cli::parser::{AgendaAction, Commands};
use crate::config::Config;
use crate::core::catalog::AgendaCatalog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::agenda_item::{AgendaItem, AgendaItemPatch, NewAgendaItem};
use crate::models::slot::SlotKey;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{RESET, color_for_active, colorize_flag};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Agenda { action } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open(&cfg.database, cfg.busy_timeout())?;
    let catalog = AgendaCatalog::new(&pool);

    match action {
        AgendaAction::Add {
            day,
            index,
            parallel,
            time,
            title,
            no_checkin,
            inactive,
        } => {
            let item = catalog.create_item(&NewAgendaItem {
                slot: SlotKey::new(day.clone(), *index, *parallel),
                time: time.clone(),
                title: title.clone(),
                requires_check_in: !*no_checkin,
                is_active: !*inactive,
            })?;
            success(format!(
                "Added agenda item #{} at {}: {}",
                item.id,
                item.slot(),
                item.title
            ));
        }

        AgendaAction::Edit {
            id,
            day,
            index,
            parallel,
            time,
            title,
            requires_checkin,
        } => {
            let patch = AgendaItemPatch {
                day: day.clone(),
                item_index: *index,
                is_parallel: *parallel,
                time: time.clone(),
                title: title.clone(),
                requires_check_in: *requires_checkin,
            };
            if patch.is_empty() {
                warning("Nothing to change.");
            }
            let item = catalog.update_item(*id, &patch)?;
            success(format!("Agenda item #{} now at {}", item.id, item.slot()));
        }

        AgendaAction::List { day, active, json } => {
            let days = match day {
                Some(d) => vec![d.clone()],
                None => catalog.days()?,
            };

            let mut items = Vec::new();
            for d in &days {
                if *active {
                    for item in catalog.list_active(d) {
                        items.push(item?);
                    }
                } else {
                    items.extend(catalog.list_day(d)?);
                }
            }

            if *json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                info("No agenda items.");
            } else {
                print_items(&items);
            }
        }

        AgendaAction::Activate { id } => {
            let item = catalog.set_active(*id, true)?;
            success(format!("Agenda item #{} ({}) activated.", item.id, item.slot()));
        }

        AgendaAction::Deactivate { id } => {
            let item = catalog.set_active(*id, false)?;
            success(format!(
                "Agenda item #{} ({}) deactivated.",
                item.id,
                item.slot()
            ));
        }
    }

    Ok(())
}

const COLUMNS: [&str; 7] = ["ID", "#", "TRACK", "TIME", "TITLE", "CHECK-IN", "ACTIVE"];

fn print_items(items: &[AgendaItem]) {
    let mut current_day: Option<&str> = None;
    let mut table = Table::new(COLUMNS);

    for item in items {
        if current_day != Some(item.day.as_str()) {
            if let Some(d) = current_day {
                header(d);
                print!("{}", table.render());
                table = Table::new(COLUMNS);
            }
            current_day = Some(item.day.as_str());
        }

        let color = color_for_active(item.is_active);
        table.add_row(vec![
            item.id.to_string(),
            item.item_index.to_string(),
            if item.is_parallel { "parallel" } else { "main" }.to_string(),
            item.time.clone(),
            format!("{}{}{}", color, item.title, RESET),
            colorize_flag(item.requires_check_in),
            colorize_flag(item.is_active),
        ]);
    }

    if let Some(d) = current_day
        && !table.is_empty()
    {
        header(d);
        print!("{}", table.render());
    }
}
