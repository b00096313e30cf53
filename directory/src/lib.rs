/*!
# Roster Directory

Incremental filtering and aggregation over a directory of user records:
- **Debounced name search**: only the settled value of a typing burst filters
- **Composable predicates**: case-insensitive name substring AND exact city
- **Oldest per city**: earliest-born record of each group, independent of filters
- **Projection**: visible rows with a highlight flag and a count

## Architecture

```text
RecordSource ──> RecordStore
                   ├─> compose_visible (FilterState)   ── memoized per (revision, filters)
                   └─> GroupAggregate::compute         ── memoized per revision
                         └─> project (highlight flag)
                               └─> ProjectedView
keystrokes ──> Debouncer ──> settled name pattern ──> FilterState
```

## Example

```rust,no_run
use roster_directory::{DirectoryConfig, DirectoryController, HttpRecordSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DirectoryConfig::default();
    let source = HttpRecordSource::new(&config)?;
    let mut controller = DirectoryController::new(config)?;
    controller.load(&source).await;

    controller.handle_keystroke("an");
    controller.next_settled().await;
    controller.set_highlight_oldest(true);

    let view = controller.view();
    for row in &view.rows {
        let marker = if row.is_flagged { "*" } else { " " };
        println!("{marker} {} {} ({})", row.record.first_name, row.record.last_name, row.record.group_key);
    }
    println!("Total users: {}", view.count);

    controller.shutdown();
    Ok(())
}
```

## Invalid dates

A record whose birth date does not parse still shows up in the visible set
but never competes for "oldest in city". See [`GroupAggregate`].
*/

mod aggregate;
mod config;
mod controller;
mod error;
mod filter;
mod projection;
mod record;
mod session;
mod source;

pub use aggregate::GroupAggregate;
pub use config::{DirectoryConfig, ThemeColor};
pub use controller::DirectoryController;
pub use error::{DirectoryError, Result};
pub use filter::{FilterState, Predicate, compose_visible};
pub use projection::{ProjectedRow, ProjectedView, project};
pub use record::{Record, RecordStore, parse_birth_date};
pub use session::{DirectorySession, FilterCacheStats};
pub use source::{HttpRecordSource, RecordSource, StaticRecordSource};
