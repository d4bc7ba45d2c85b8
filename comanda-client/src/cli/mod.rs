//! Command line surface of the `comanda` binary

pub mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shared::board::Station;
use shared::models::DocumentType;

#[derive(Parser, Debug)]
#[command(name = "comanda", author, version, about = "Restaurant POS client")]
pub struct Cli {
    /// Back-end base URL
    #[arg(long, global = true, env = "COMANDA_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Directory holding the session cookie and the cart
    #[arg(long, global = true, env = "COMANDA_SESSION_DIR")]
    pub session_dir: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, env = "COMANDA_LOG")]
    pub log: Option<String>,

    /// Hosted back-end: longer reconnect backoff
    #[arg(long, global = true)]
    pub wan: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a session
    Login {
        #[arg(long, short)]
        email: String,
        #[arg(long, short, env = "COMANDA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session and drop the cart
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Registration and password recovery
    #[command(subcommand)]
    Account(AccountCommand),
    /// List the menu and the floor selection
    Menu(MenuArgs),
    /// Edit or submit the cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Live order boards
    Board {
        #[arg(value_enum)]
        kind: BoardKind,
        #[command(flatten)]
        filter: TableFilter,
        /// Keep following push updates (Ctrl-C to stop)
        #[arg(long, short)]
        watch: bool,
    },
    /// Serve one ticket of a station board
    Serve {
        #[arg(value_parser = parse_station)]
        station: Station,
        /// Ticket position as listed by `board`
        index: usize,
    },
    /// Customer lookup and capture
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Order maintenance
    #[command(subcommand)]
    Order(OrderCommand),
    /// Ask the print service for a table's pre-bill
    Precuenta(TableArgs),
    /// Order statistics
    Stats,
    /// Back-office maintenance
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// E-mail a registration code
    RequestCode { email: String },
    /// Check a code received by e-mail
    Verify { email: String, code: String },
    /// Create the account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "COMANDA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// E-mail a password recovery code
    ForgotPassword { email: String },
    /// Set a new password with a recovery code
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
        #[arg(long, env = "COMANDA_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct MenuArgs {
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long, default_value = "")]
    pub search: String,
    #[command(flatten)]
    pub table: TableFilter,
    /// Reload when the catalog changes (Ctrl-C to stop)
    #[arg(long, short)]
    pub watch: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct TableFilter {
    /// Room name
    #[arg(long)]
    pub room: Option<String>,
    /// Table number
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    #[arg(long)]
    pub room: String,
    #[arg(long)]
    pub table: String,
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
    Show,
    /// Add one unit
    Add { product: i64 },
    /// Remove one unit
    Remove { product: i64 },
    /// Remove the product with all its units
    Drop { product: i64 },
    /// Add a comment for the next uncommented unit
    Comment { product: i64, text: String },
    /// Replace the comment in slot `index`
    SetComment {
        product: i64,
        index: usize,
        text: String,
    },
    DeleteComment { product: i64, index: usize },
    /// Send the cart as an order
    Submit {
        /// Room name or id, defaults to the first room
        #[arg(long)]
        room: Option<String>,
        /// Table number, defaults to the room's first table
        #[arg(long)]
        table: Option<i64>,
    },
    /// Empty the cart without ordering
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoardKind {
    Waiter,
    Bar,
    Grill,
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Resolve a name from a DNI / RUC
    Lookup {
        #[arg(value_parser = parse_document_type)]
        doc_type: DocumentType,
        document: String,
    },
    /// Attach a customer to the active order of a table
    Capture {
        #[command(flatten)]
        table: TableArgs,
        #[arg(value_parser = parse_document_type)]
        doc_type: DocumentType,
        document: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Active order of a table
    Show {
        #[arg(long)]
        table: String,
        #[arg(long)]
        room: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    #[command(subcommand)]
    Products(ProductCommand),
    #[command(subcommand)]
    Categories(NamedCommand),
    #[command(subcommand)]
    Areas(NamedCommand),
    #[command(subcommand)]
    Rooms(NamedCommand),
    #[command(subcommand)]
    Tables(TableCommand),
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: rust_decimal::Decimal,
    #[arg(long)]
    pub category: i64,
    #[arg(long)]
    pub area: i64,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    List,
    Create(ProductFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete { id: i64 },
}

/// Categories, areas and rooms only carry a name
#[derive(Subcommand, Debug)]
pub enum NamedCommand {
    List,
    Create { name: String },
    Update { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum TableCommand {
    List,
    Create {
        #[arg(long)]
        number: i64,
        #[arg(long)]
        room: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        number: i64,
        #[arg(long)]
        room: i64,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List,
    Activate { id: i64 },
    Deactivate { id: i64 },
}

fn parse_station(s: &str) -> Result<Station, String> {
    s.parse()
}

fn parse_document_type(s: &str) -> Result<DocumentType, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_board_and_customer_commands() {
        let cli = Cli::parse_from(["comanda", "board", "waiter", "--room", "Terraza", "--watch"]);
        match cli.command {
            Command::Board { kind, filter, watch } => {
                assert_eq!(kind, BoardKind::Waiter);
                assert_eq!(filter.room.as_deref(), Some("Terraza"));
                assert!(watch);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from([
            "comanda", "customer", "capture", "--room", "Terraza", "--table", "5", "ruc",
            "20123456789",
        ]);
        assert!(matches!(
            cli.command,
            Command::Customer(CustomerCommand::Capture {
                doc_type: DocumentType::Ruc,
                ..
            })
        ));

        let cli = Cli::parse_from(["comanda", "serve", "plancha", "3"]);
        assert!(matches!(
            cli.command,
            Command::Serve {
                station: Station::Grill,
                index: 3
            }
        ));

        let cli = Cli::parse_from(["comanda", "menu", "--search", "pisco", "-w"]);
        match cli.command {
            Command::Menu(args) => {
                assert_eq!(args.search, "pisco");
                assert!(args.watch);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
