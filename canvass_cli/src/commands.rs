// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::{bail, Result};
use canvass::db::traits::Repository;
use canvass::form::{AddressEntry, FormEntry, RecordForm};
use canvass::view::{FilterItem, SortItem};
use canvass::workspace::NewWorkspace;
use canvass::{Dashboard, RecordType, UserId, ViewId, ViewSession, WorkspaceId, WorkspaceType};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::output::{format_fields, format_table, format_view, format_workspace};
use crate::parse::{parse_address, parse_assignment, parse_entry, parse_filter, parse_sort};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database if needed and run all pending migrations.
    Migrate,

    /// Create, list and select workspaces.
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommand,
    },

    /// List the fields of a record type.
    Fields {
        /// One of "contacts", "businesses" or "donations".
        record_type: RecordType,
    },

    /// Create and edit saved views.
    View {
        #[command(subcommand)]
        command: ViewCommand,
    },

    /// Show records of a workspace through a view.
    Records(RecordsArgs),

    /// Create records and list link targets.
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// Create a workspace, owned and selected by the current user.
    Create {
        name: String,

        /// One of "state_party", "county_party" or "campaign".
        #[arg(long = "type", default_value = "campaign")]
        workspace_type: WorkspaceType,

        #[arg(long)]
        state: String,

        #[arg(long)]
        county: Option<String>,

        #[arg(long)]
        race: Option<String>,
    },

    /// List all workspaces of the current user.
    List,

    /// Select a workspace for the current user.
    Select { workspace: WorkspaceId },

    /// Show the selected workspace.
    Current,
}

/// Records shown by a view command.
#[derive(Args, Debug)]
pub struct ViewTarget {
    workspace: WorkspaceId,

    record_type: RecordType,

    /// Saved view to edit, the first saved view by default.
    #[arg(long)]
    view: Option<ViewId>,
}

#[derive(Subcommand, Debug)]
pub enum ViewCommand {
    /// List the saved views of a record type.
    List {
        workspace: WorkspaceId,
        record_type: RecordType,
    },

    /// Create a view showing all fields.
    Create {
        workspace: WorkspaceId,
        record_type: RecordType,
        name: String,
    },

    /// Make a field visible, appending it as last column.
    Show {
        #[command(flatten)]
        target: ViewTarget,
        field: String,
    },

    /// Hide a field.
    Hide {
        #[command(flatten)]
        target: ViewTarget,
        field: String,
    },

    /// Add a filter in the form field:operator[:value].
    FilterAdd {
        #[command(flatten)]
        target: ViewTarget,

        #[arg(value_parser = parse_filter)]
        filter: FilterItem,
    },

    /// Remove the filter with the given id.
    FilterRemove {
        #[command(flatten)]
        target: ViewTarget,
        id: String,
    },

    /// Remove all filters.
    FilterClear {
        #[command(flatten)]
        target: ViewTarget,
    },

    /// Advance the ordering by a field: ascending, descending, none.
    Sort {
        #[command(flatten)]
        target: ViewTarget,
        field: String,
    },
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    workspace: WorkspaceId,

    record_type: RecordType,

    /// Saved view to show, the first saved view by default.
    #[arg(long)]
    view: Option<ViewId>,

    /// Additional filter in the form field:operator[:value], applied on top of the view.
    #[arg(long, value_parser = parse_filter)]
    filter: Vec<FilterItem>,

    /// Ordering in the form field[:asc|:desc], replacing the one of the view.
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortItem>,
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    /// Create a record from field values.
    Create {
        workspace: WorkspaceId,

        record_type: RecordType,

        /// Single-valued field in the form key=value.
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Email, phone or social media entry in the form key=value[:type[:status]].
        #[arg(long = "entry", value_parser = parse_entry)]
        entries: Vec<(String, FormEntry)>,

        /// Postal address in the form key=street1|street2|city|state|postal_code[|type[|primary]].
        #[arg(long = "address", value_parser = parse_address)]
        addresses: Vec<(String, AddressEntry)>,
    },

    /// List records which can be linked to, with their labels.
    Options {
        workspace: WorkspaceId,
        record_type: RecordType,
    },
}

/// Runs a command against the dashboard on behalf of the given user.
pub async fn run<S: Repository>(
    dashboard: &Dashboard<S>,
    user: &UserId,
    command: Command,
) -> Result<()> {
    match command {
        Command::Migrate => println!("{}", "Database is up to date".green()),
        Command::Workspace { command } => run_workspace(dashboard, user, command).await?,
        Command::Fields { record_type } => {
            let fields = dashboard.fields(record_type).await?;
            println!("{}", format_fields(&fields));
        }
        Command::View { command } => run_view(dashboard, command).await?,
        Command::Records(args) => {
            let mut session = dashboard
                .open_session(&args.workspace, args.record_type, args.view.as_ref())
                .await?;
            apply_records_args(&mut session, args.filter, args.sort)?;

            let table = dashboard.table(&session).await?;
            println!("{}", format_table(&table));
        }
        Command::Record { command } => run_record(dashboard, command).await?,
    }

    Ok(())
}

async fn run_workspace<S: Repository>(
    dashboard: &Dashboard<S>,
    user: &UserId,
    command: WorkspaceCommand,
) -> Result<()> {
    match command {
        WorkspaceCommand::Create {
            name,
            workspace_type,
            state,
            county,
            race,
        } => {
            let workspace = dashboard
                .create_workspace(
                    &NewWorkspace {
                        name,
                        workspace_type,
                        state,
                        county,
                        race,
                    },
                    user,
                )
                .await?;

            println!("{}", format_workspace(&workspace, None));
        }
        WorkspaceCommand::List => {
            let selected = dashboard.selected_workspace(user).await?;

            for (workspace, role) in dashboard.workspaces(user).await? {
                let marker = match &selected {
                    Some(selected) if selected.id == workspace.id => "* ",
                    _ => "  ",
                };

                println!("{}{}", marker, format_workspace(&workspace, Some(role)));
            }
        }
        WorkspaceCommand::Select { workspace } => {
            dashboard.select_workspace(user, &workspace).await?;
            println!("Selected workspace {}", workspace.to_string().blue());
        }
        WorkspaceCommand::Current => match dashboard.selected_workspace(user).await? {
            Some(workspace) => println!("{}", format_workspace(&workspace, None)),
            None => println!("No workspace selected"),
        },
    }

    Ok(())
}

async fn run_view<S: Repository>(dashboard: &Dashboard<S>, command: ViewCommand) -> Result<()> {
    match command {
        ViewCommand::List {
            workspace,
            record_type,
        } => {
            let views = dashboard.views(&workspace, record_type).await?;

            if views.is_empty() {
                println!("No saved views, the default view shows all fields");
            }

            for view in views {
                let id = view.id.as_ref().map(ViewId::to_string).unwrap_or_default();
                println!("{} {}", id.dimmed(), view.name);
            }
        }
        ViewCommand::Create {
            workspace,
            record_type,
            name,
        } => {
            let view = dashboard.create_view(&workspace, record_type, &name).await?;
            let session = ViewSession::new(view, dashboard.fields(record_type).await?);
            println!("{}", format_view(&session));
        }
        ViewCommand::Show { target, field } => {
            edit_view(dashboard, target, |session| set_visible(session, &field, true)).await?
        }
        ViewCommand::Hide { target, field } => {
            edit_view(dashboard, target, |session| set_visible(session, &field, false)).await?
        }
        ViewCommand::FilterAdd { target, filter } => {
            edit_view(dashboard, target, move |session| {
                let mut filters = session.settings().filters.clone();
                filters.push(filter);
                session.set_filters(filters);
                Ok(())
            })
            .await?
        }
        ViewCommand::FilterRemove { target, id } => {
            edit_view(dashboard, target, |session| Ok(session.remove_filter(&id)?)).await?
        }
        ViewCommand::FilterClear { target } => {
            edit_view(dashboard, target, |session| {
                session.set_filters(Vec::new());
                Ok(())
            })
            .await?
        }
        ViewCommand::Sort { target, field } => {
            edit_view(dashboard, target, |session| Ok(session.toggle_sort(&field)?)).await?
        }
    }

    Ok(())
}

/// Opens a session on the targeted view, applies the edit and saves it.
async fn edit_view<S, F>(dashboard: &Dashboard<S>, target: ViewTarget, edit: F) -> Result<()>
where
    S: Repository,
    F: FnOnce(&mut ViewSession) -> Result<()>,
{
    let mut session = dashboard
        .open_session(&target.workspace, target.record_type, target.view.as_ref())
        .await?;

    edit(&mut session)?;
    dashboard.save_session(&mut session).await?;

    println!("{}", format_view(&session));

    Ok(())
}

fn set_visible(session: &mut ViewSession, field: &str, visible: bool) -> Result<()> {
    if session.settings().is_visible(field) != visible {
        session.toggle_field(field)?;
    } else if !session.fields().iter().any(|known| known.key == field) {
        bail!("Unknown field '{}'", field);
    }

    Ok(())
}

/// Adds ad-hoc filters to the session and replaces its ordering, without saving anything.
fn apply_records_args(
    session: &mut ViewSession,
    filters: Vec<FilterItem>,
    sort: Option<SortItem>,
) -> Result<()> {
    if !filters.is_empty() {
        let mut all_filters = session.settings().filters.clone();
        all_filters.extend(filters);
        session.set_filters(all_filters);
    }

    if let Some(sort) = sort {
        let sortable = session
            .columns()
            .iter()
            .any(|column| column.field() == sort.field && column.sortable);

        if !sortable {
            bail!("Can not sort by field '{}'", sort.field);
        }

        let mut view = session.view().clone();
        view.settings.sorts = vec![sort];
        session.select(view);
    }

    Ok(())
}

async fn run_record<S: Repository>(dashboard: &Dashboard<S>, command: RecordCommand) -> Result<()> {
    match command {
        RecordCommand::Create {
            workspace,
            record_type,
            values,
            entries,
            addresses,
        } => {
            let mut form = RecordForm::new();

            for (key, value) in &values {
                form.set_text(key, value);
            }

            for (key, entry) in entries {
                form.push_entry(&key, entry);
            }

            for (key, address) in addresses {
                form.push_address(&key, address);
            }

            let record = dashboard
                .create_record(&workspace, record_type, &form)
                .await?;

            println!(
                "Created {} {} ({})",
                record_type.display_name().to_lowercase(),
                record.id.to_string().blue(),
                record.payload.label()
            );
        }
        RecordCommand::Options {
            workspace,
            record_type,
        } => {
            let options = dashboard
                .linked_record_options(&workspace, record_type)
                .await?;

            if options.is_empty() {
                println!("No {} records in workspace {}", record_type, workspace);
            }

            for (id, label) in options {
                println!("{} {}", id.to_string().dimmed(), label);
            }
        }
    }

    Ok(())
}
