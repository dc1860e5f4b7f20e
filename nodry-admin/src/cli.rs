use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nodry_model::{DocumentCategory, DocumentId, InquiryType, ManufacturerId};

#[derive(Parser, Debug)]
#[command(
    name = "nodry",
    version,
    about = "No Dry Starts admin tool",
    long_about = "Manage manufacturers, documents, leads, RFQs and page content \
                  on the No Dry Starts backend."
)]
pub struct Cli {
    /// Config file (TOML); defaults to $NODRY_CONFIG or the platform config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Extra .env file to load before reading NODRY_* variables
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Backend base URL, e.g. https://nodrystarts.com/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "NODRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the effective backend and session state
    Status,
    /// Count leads, RFQs, manufacturers and documents
    Summary,
    /// Manufacturer directory
    Manufacturers {
        #[command(subcommand)]
        action: ManufacturerAction,
    },
    /// Patents, diagrams and other documents
    Documents {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Contact form leads
    Leads {
        #[command(subcommand)]
        action: LeadAction,
    },
    /// Requests for quote
    Rfq {
        #[command(subcommand)]
        action: RfqAction,
    },
    /// Editable page content blocks
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Investor deck requests and downloads
    Investor {
        #[command(subcommand)]
        action: InvestorAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ManufacturerFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub website: Option<String>,
    /// Create the manufacturer hidden from the partners page
    #[arg(long)]
    pub inactive: bool,
}

/// Fields left out keep their current value.
#[derive(Args, Debug, Clone, Default)]
pub struct ManufacturerPatch {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum ManufacturerAction {
    List,
    Show {
        id: ManufacturerId,
    },
    Create(ManufacturerFields),
    Update {
        id: ManufacturerId,
        #[command(flatten)]
        patch: ManufacturerPatch,
    },
    Delete {
        id: ManufacturerId,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentAction {
    List {
        #[arg(long)]
        category: Option<DocumentCategory>,
    },
    Show {
        id: DocumentId,
    },
    /// Upload a file with its metadata
    Upload {
        path: PathBuf,
        #[arg(long)]
        category: DocumentCategory,
        /// Display name; defaults to the file name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Register metadata for a file already in static storage
    Create {
        #[arg(long)]
        file_name: String,
        #[arg(long)]
        category: DocumentCategory,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: DocumentId,
        #[arg(long)]
        file_name: Option<String>,
        #[arg(long)]
        category: Option<DocumentCategory>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: DocumentId,
    },
}

#[derive(Subcommand, Debug)]
pub enum LeadAction {
    List {
        /// Only leads from this form (contact, investor, manufacturer, rfq)
        #[arg(long = "type")]
        inquiry_type: Option<InquiryType>,
    },
    /// Download all leads as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Record a lead as the public contact form would
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
        #[arg(long = "type", default_value = "contact")]
        inquiry_type: InquiryType,
    },
}

#[derive(Subcommand, Debug)]
pub enum RfqAction {
    List,
    /// Download all RFQ submissions as CSV
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Submit an RFQ as the public form would
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        message: String,
        /// Drawing or specification to attach (10 MB max by default)
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
#[group(required = false, multiple = false)]
pub struct HtmlSource {
    /// Inline HTML content
    #[arg(long)]
    pub html: Option<String>,
    /// Read HTML content from a file
    #[arg(long)]
    pub html_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ContentAction {
    List {
        /// Only blocks of this page, in display order
        #[arg(long)]
        page: Option<String>,
    },
    Show {
        slug: String,
    },
    Create {
        slug: String,
        #[arg(long)]
        title: String,
        #[command(flatten)]
        html: HtmlSource,
        #[arg(long, default_value = nodry_model::DEFAULT_PAGE)]
        page: String,
        #[arg(long, default_value_t = 0)]
        order: i32,
        #[arg(long)]
        inactive: bool,
    },
    Update {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        html: HtmlSource,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        slug: String,
    },
    /// Move a block within a page by display position and save the order
    Move {
        #[arg(long, default_value = nodry_model::DEFAULT_PAGE)]
        page: String,
        /// Current zero-based position
        from: usize,
        /// Target zero-based position
        to: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum InvestorAction {
    /// Ask for a download link to be emailed
    Request {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Fetch the deck behind an emailed token
    Download {
        token: String,
        #[arg(long, short)]
        output: PathBuf,
    },
}
