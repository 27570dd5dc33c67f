//! Command-line front end driving the list controller against a live backend.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::Config;
use thiserror::Error;

use crate::controller::view::{ListView, error_banner};
use crate::controller::{Confirm, Deletion, ListController, ListSettings, QueryState};
use crate::domain::contact::Contact;
use crate::domain::document::Document;
use crate::domain::playbook::Playbook;
use crate::domain::quote::Quote;
use crate::domain::resource::{Resource, ResourceKind};
use crate::domain::ticket::InternalTicket;
use crate::forms::FormError;
use crate::forms::contact::ContactForm;
use crate::forms::document::DocumentForm;
use crate::forms::ticket::TicketForm;
use crate::models::config::ConsoleConfig;
use crate::resources::FileUpload;
use crate::resources::errors::ClientError;
use crate::resources::http::{ApiClient, HttpResource};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid form: {0}")]
    Form(#[from] FormError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{resource} cannot be filtered by `{name}` (expected one of: {expected})")]
    UnknownFilter {
        resource: ResourceKind,
        name: String,
        expected: String,
    },
}

#[derive(Parser)]
#[command(
    name = "crm-console",
    version,
    about = "Browse and edit CRM resources from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one page of a resource list
    List {
        resource: ResourceKind,
        #[arg(long, default_value = "")]
        search: String,
        /// Filter as `name=value`; may be repeated
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Write the page as CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Delete one item after confirmation
    Delete {
        resource: ResourceKind,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Upload a document with its metadata
    Upload {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        folder: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// MIME type sent with the file, e.g. `application/pdf`
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Create a contact
    CreateContact {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        company: String,
    },
    /// Open an internal ticket
    CreateTicket {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long, default_value = "")]
        assignee: String,
    },
}

fn parse_filter(value: &str) -> Result<(String, String), String> {
    let (name, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{value}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("filter name cannot be empty".to_string());
    }
    Ok((name.to_string(), value.to_string()))
}

/// Loads `config/default.yaml`, the `APP_ENV` profile and `APP_*` variables.
pub fn load_config() -> Result<ConsoleConfig, config::ConfigError> {
    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

/// Column layout of a resource in table and CSV output.
pub trait TableRow: Resource + Clone {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl TableRow for Contact {
    const HEADERS: &'static [&'static str] = &["id", "name", "email", "phone", "company", "status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.email.as_deref()),
            or_dash(self.phone.as_deref()),
            or_dash(self.company.as_deref()),
            or_dash(self.status.as_deref()),
        ]
    }
}

impl TableRow for Quote {
    const HEADERS: &'static [&'static str] =
        &["id", "number", "title", "status", "total", "valid_until"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.number.clone(),
            self.title.clone(),
            self.status.as_str().to_string(),
            self.total.clone(),
            self.valid_until
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl TableRow for InternalTicket {
    const HEADERS: &'static [&'static str] = &["id", "subject", "priority", "status", "assignee"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.subject.clone(),
            self.priority.to_string(),
            self.status.to_string(),
            or_dash(self.assignee.as_deref()),
        ]
    }
}

impl TableRow for Document {
    const HEADERS: &'static [&'static str] = &["id", "title", "folder", "tags"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            or_dash(self.folder.as_deref()),
            self.tags.join(","),
        ]
    }
}

impl TableRow for Playbook {
    const HEADERS: &'static [&'static str] = &["id", "name", "active", "steps"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            if self.is_active { "yes" } else { "no" }.to_string(),
            self.steps_count.to_string(),
        ]
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub struct ListArgs {
    pub query: QueryState,
    pub csv: bool,
}

impl ListArgs {
    /// Rejects filters the resource's list page does not expose.
    fn new(
        resource: ResourceKind,
        search: String,
        filters: Vec<(String, String)>,
        page: u32,
        csv: bool,
    ) -> Result<Self, CliError> {
        let allowed = resource.filter_names();
        if let Some((name, _)) = filters
            .iter()
            .find(|(name, _)| !allowed.contains(&name.as_str()))
        {
            return Err(CliError::UnknownFilter {
                resource,
                name: name.clone(),
                expected: allowed.join(", "),
            });
        }

        let query = QueryState {
            page,
            search,
            filters: filters
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect(),
            ..QueryState::default()
        };
        Ok(Self { query, csv })
    }
}

/// Renders the page body the same way the web front end does: loading,
/// empty state with a call-to-action, or the table with its pagination.
pub fn render_page<R, W>(
    out: &mut W,
    snapshot: &crate::controller::ListSnapshot<R>,
    page_size: usize,
) -> io::Result<()>
where
    R: TableRow,
    W: Write,
{
    if let Some(error) = &snapshot.error {
        writeln!(out, "! {}", error_banner(error))?;
    }

    match ListView::from_snapshot(R::KIND, snapshot, page_size) {
        ListView::Loading => writeln!(out, "Loading…"),
        ListView::Empty(cta) => {
            writeln!(out, "No {} found.", R::KIND)?;
            writeln!(out, "{}: {}", cta.label, cta.route)
        }
        ListView::Table { rows, pagination } => {
            writeln!(out, "{}", R::HEADERS.join("\t"))?;
            for row in rows {
                writeln!(out, "{}", row.cells().join("\t"))?;
            }
            let pages = pagination
                .pages
                .iter()
                .map(|page| match page {
                    Some(page) if pagination.is_current(*page) => format!("[{page}]"),
                    Some(page) => page.to_string(),
                    None => "…".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                "Page {} of {} ({} total): {pages}",
                pagination.current, pagination.total_pages, snapshot.result.count
            )
        }
    }
}

pub fn write_csv<R, W>(out: W, rows: &[R]) -> Result<(), csv::Error>
where
    R: TableRow,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

async fn list_page<R: TableRow>(
    api: &ApiClient,
    settings: ListSettings,
    args: ListArgs,
) -> Result<(), CliError> {
    let controller =
        ListController::new(HttpResource::<R>::new(api.clone()), settings).with_query(args.query);
    controller.mount().await?;

    let snapshot = controller.snapshot();
    let stdout = io::stdout();
    if args.csv {
        write_csv(stdout.lock(), &snapshot.result.results)?;
    } else {
        render_page(&mut stdout.lock(), &snapshot, settings.page_size)?;
    }
    Ok(())
}

async fn delete_item<R: Resource>(
    api: &ApiClient,
    settings: ListSettings,
    id: &str,
    confirm: &dyn Confirm,
) -> Result<(), CliError> {
    let controller = ListController::new(HttpResource::<R>::new(api.clone()), settings);
    match controller.delete(id, confirm).await? {
        Deletion::Deleted => println!("Deleted {} {id}", R::KIND),
        Deletion::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

impl Cli {
    pub async fn run(self, config: ConsoleConfig) -> Result<(), CliError> {
        let api = ApiClient::from_config(&config)?;
        let settings = ListSettings::from(&config);

        match self.command {
            Command::List {
                resource,
                search,
                filters,
                page,
                csv,
            } => {
                let args = ListArgs::new(resource, search, filters, page, csv)?;
                match resource {
                    ResourceKind::Contacts => list_page::<Contact>(&api, settings, args).await,
                    ResourceKind::Quotes => list_page::<Quote>(&api, settings, args).await,
                    ResourceKind::InternalTickets => {
                        list_page::<InternalTicket>(&api, settings, args).await
                    }
                    ResourceKind::Documents => list_page::<Document>(&api, settings, args).await,
                    ResourceKind::Playbooks => list_page::<Playbook>(&api, settings, args).await,
                }
            }
            Command::Delete { resource, id, yes } => {
                let confirm: &dyn Confirm = if yes { &AlwaysConfirm } else { &TerminalConfirm };
                match resource {
                    ResourceKind::Contacts => {
                        delete_item::<Contact>(&api, settings, &id, confirm).await
                    }
                    ResourceKind::Quotes => {
                        delete_item::<Quote>(&api, settings, &id, confirm).await
                    }
                    ResourceKind::InternalTickets => {
                        delete_item::<InternalTicket>(&api, settings, &id, confirm).await
                    }
                    ResourceKind::Documents => {
                        delete_item::<Document>(&api, settings, &id, confirm).await
                    }
                    ResourceKind::Playbooks => {
                        delete_item::<Playbook>(&api, settings, &id, confirm).await
                    }
                }
            }
            Command::Upload {
                file,
                title,
                folder,
                tags,
                content_type,
            } => {
                let form = DocumentForm {
                    title,
                    folder,
                    tags: tags.join(","),
                };
                let mut file = FileUpload::from_path(&file)?;
                if let Some(content_type) = content_type {
                    file = file.content_type(content_type);
                }
                let upload = form.into_upload(file)?;
                let controller =
                    ListController::new(HttpResource::<Document>::new(api), settings);
                let document = controller.upload(&upload).await?;
                println!(
                    "Uploaded {}",
                    Document::KIND.detail_route(&document.id.to_string())
                );
                Ok(())
            }
            Command::CreateContact {
                name,
                email,
                phone,
                company,
            } => {
                let form = ContactForm {
                    name,
                    email,
                    phone,
                    company,
                    status: String::new(),
                };
                let controller = ListController::new(HttpResource::<Contact>::new(api), settings);
                let contact = controller.create_validated(form).await?;
                println!(
                    "Created {}",
                    Contact::KIND.detail_route(&contact.id.to_string())
                );
                Ok(())
            }
            Command::CreateTicket {
                subject,
                description,
                priority,
                assignee,
            } => {
                let form = TicketForm {
                    subject,
                    description,
                    priority,
                    assignee,
                };
                let controller =
                    ListController::new(HttpResource::<InternalTicket>::new(api), settings);
                let ticket = controller.create_validated(form).await?;
                println!(
                    "Created {}",
                    InternalTicket::KIND.detail_route(&ticket.id.to_string())
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ListSnapshot;
    use crate::domain::types::PlaybookId;
    use crate::pagination::PaginatedResponse;

    fn playbook(id: i64, name: &str) -> Playbook {
        Playbook {
            id: PlaybookId::new(id).unwrap(),
            name: name.to_string(),
            description: String::new(),
            is_active: id % 2 == 1,
            steps_count: 3,
        }
    }

    fn snapshot(count: usize, rows: Vec<Playbook>) -> ListSnapshot<Playbook> {
        ListSnapshot {
            query: QueryState {
                loading: false,
                ..QueryState::default()
            },
            result: PaginatedResponse::new(count, rows),
            error: None,
        }
    }

    #[test]
    fn parses_list_command_with_filters() {
        let cli = Cli::try_parse_from([
            "crm-console",
            "list",
            "internal-tickets",
            "--search",
            "vpn",
            "--filter",
            "status=open",
            "--filter",
            "priority=high",
            "--page",
            "2",
        ])
        .unwrap();

        let Command::List {
            resource,
            search,
            filters,
            page,
            csv,
        } = cli.command
        else {
            panic!("expected list command");
        };
        assert_eq!(resource, ResourceKind::InternalTickets);
        assert_eq!(search, "vpn");
        assert_eq!(
            filters,
            vec![
                ("status".to_string(), "open".to_string()),
                ("priority".to_string(), "high".to_string())
            ]
        );
        assert_eq!(page, 2);
        assert!(!csv);
    }

    #[test]
    fn rejects_malformed_filters_and_unknown_resources() {
        assert!(
            Cli::try_parse_from(["crm-console", "list", "contacts", "--filter", "open"]).is_err()
        );
        assert!(Cli::try_parse_from(["crm-console", "list", "invoices"]).is_err());
    }

    #[test]
    fn list_args_build_query_state() {
        let args = ListArgs::new(
            ResourceKind::Contacts,
            "acme".to_string(),
            vec![("status".to_string(), "all".to_string())],
            3,
            false,
        )
        .unwrap();

        assert_eq!(args.query.page, 3);
        assert_eq!(args.query.filter("status"), Some("all"));
        assert!(!args.query.to_params().contains_key("status"));
    }

    #[test]
    fn list_args_reject_filters_the_page_does_not_expose() {
        let err = ListArgs::new(
            ResourceKind::Quotes,
            String::new(),
            vec![("owner".to_string(), "jane".to_string())],
            1,
            false,
        )
        .err()
        .expect("owner is not a quotes filter");

        assert!(matches!(
            &err,
            CliError::UnknownFilter { resource: ResourceKind::Quotes, name, .. } if name == "owner"
        ));
        assert_eq!(
            err.to_string(),
            "quotes cannot be filtered by `owner` (expected one of: status)"
        );
    }

    #[test]
    fn parses_upload_content_type() {
        let cli = Cli::try_parse_from([
            "crm-console",
            "upload",
            "--file",
            "contract.pdf",
            "--title",
            "Master agreement",
            "--tag",
            "legal",
            "--content-type",
            "application/pdf",
        ])
        .unwrap();

        let Command::Upload {
            content_type, tags, ..
        } = cli.command
        else {
            panic!("expected upload command");
        };
        assert_eq!(content_type.as_deref(), Some("application/pdf"));
        assert_eq!(tags, vec!["legal"]);
    }

    #[test]
    fn renders_table_with_highlighted_page() {
        let snapshot = snapshot(57, vec![playbook(1, "Onboarding"), playbook(2, "Renewal")]);
        let mut out = Vec::new();

        render_page(&mut out, &snapshot, 25).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id\tname\tactive\tsteps\n"));
        assert!(text.contains("1\tOnboarding\tyes\t3\n"));
        assert!(text.ends_with("Page 1 of 3 (57 total): [1] 2 3\n"));
    }

    #[test]
    fn renders_empty_state_with_create_route() {
        let snapshot = snapshot(0, Vec::new());
        let mut out = Vec::new();

        render_page(&mut out, &snapshot, 25).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "No playbooks found.\nCreate playbook: /playbooks/new\n");
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let mut out = Vec::new();

        write_csv(&mut out, &[playbook(1, "Onboarding, EU")]).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,active,steps\n1,\"Onboarding, EU\",yes,3\n"
        );
    }
}
