//! Command execution
//!
//! Every protected command resolves the user through [`AuthGuard`] first.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use shared::board::{ServeOutcome, Station};
use shared::client::{PasswordReset, Registration};
use shared::models::{
    AreaInput, CategoryInput, DiningTableInput, ProductCreate, RoomInput, User,
};
use shared::types::{OrderId, ProductId, TableNumber};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use super::render;
use super::{
    AccountCommand, AdminCommand, BoardKind, CartCommand, Command, CustomerCommand, MenuArgs,
    NamedCommand, OrderCommand, ProductCommand, TableArgs, TableCommand, TableFilter, UserCommand,
};
use comanda_client::{
    AuthGuard, ClientConfig, GuardDecision, LiveView, MenuView, NetworkHttpClient, Notification,
    PosApi, PushClient, PushSubscription, Route, SessionStore, StationView, WaiterView,
    apply_received, watch,
};

pub struct App {
    config: ClientConfig,
    api: PosApi,
    store: SessionStore,
}

impl App {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = NetworkHttpClient::new(&config)?;
        let store = SessionStore::new(&config.session_dir);
        if store.restore_cookie(&http)? {
            tracing::debug!("Session restored");
        }
        Ok(Self {
            config,
            api: PosApi::new(http),
            store,
        })
    }

    async fn require(&self, route: Route) -> Result<User> {
        match AuthGuard::new(&self.api).check(route).await {
            GuardDecision::Allow(Some(user)) => Ok(user),
            GuardDecision::Allow(None) => bail!("{route} is public and has no user"),
            GuardDecision::RedirectToLogin => bail!("Not logged in, run `comanda login` first"),
            GuardDecision::Forbidden(user) => {
                bail!("{} may not open {route}: administrator role required", user.name)
            }
        }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login { email, password } => self.login(&email, &password).await,
            Command::Logout => {
                self.store.clear()?;
                println!("Logged out");
                Ok(())
            }
            Command::Whoami => {
                let user = self.require(Route::Profile).await?;
                println!(
                    "{} <{}> {}",
                    user.name,
                    user.email,
                    user.role_name().unwrap_or("-")
                );
                Ok(())
            }
            Command::Account(command) => self.account(command).await,
            Command::Menu(args) => self.menu(args).await,
            Command::Cart(command) => self.cart(command).await,
            Command::Board {
                kind,
                filter,
                watch: follow,
            } => match kind {
                BoardKind::Waiter => self.waiter_board(filter, follow).await,
                BoardKind::Bar => self.station_board(Station::Bar, follow).await,
                BoardKind::Grill => self.station_board(Station::Grill, follow).await,
            },
            Command::Serve { station, index } => self.serve(station, index).await,
            Command::Customer(command) => self.customer(command).await,
            Command::Order(command) => self.order(command).await,
            Command::Precuenta(table) => self.pre_bill(table).await,
            Command::Stats => {
                self.require(Route::Stats).await?;
                let stats = self.api.order_stats().await?;
                println!("Orders:        {}", stats.total_orders);
                println!("Products sold: {}", stats.total_products_sold);
                Ok(())
            }
            Command::Admin(command) => self.admin(command).await,
        }
    }

    // ── Session ─────────────────────────────────────────────────────

    async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.api.login(email, password).await?;
        if !self.store.save_cookie(self.api.http())? {
            tracing::warn!("Back-end did not set a session cookie");
        }
        let user = self.api.current_user().await?;
        println!("Logged in as {}", user.name);
        Ok(())
    }

    async fn account(&self, command: AccountCommand) -> Result<()> {
        let ack = match command {
            AccountCommand::RequestCode { email } => {
                self.api.request_registration_code(&email).await?
            }
            AccountCommand::Verify { email, code } => self.api.verify_code(&email, &code).await?,
            AccountCommand::Register {
                email,
                name,
                password,
            } => {
                self.api
                    .register(&Registration {
                        email,
                        password,
                        name,
                    })
                    .await?
            }
            AccountCommand::ForgotPassword { email } => {
                self.api.request_password_code(&email).await?
            }
            AccountCommand::ResetPassword {
                email,
                code,
                password,
            } => {
                self.api
                    .reset_password(&PasswordReset {
                        email,
                        new_password: password,
                        code,
                    })
                    .await?
            }
        };
        if let Some(error) = ack.error {
            bail!(error);
        }
        println!("{}", ack.message.unwrap_or_else(|| "Done".into()));
        Ok(())
    }

    // ── Menu & cart ─────────────────────────────────────────────────

    async fn menu_view(&self, filter: &TableFilter) -> Result<MenuView<'_, NetworkHttpClient>> {
        self.require(Route::Menu).await?;
        let mut menu = MenuView::new(&self.api, &self.store);
        menu.load().await?;
        if let Some(room) = &filter.room {
            menu.select_room(room)?;
        }
        if let Some(table) = &filter.table {
            let number = table
                .parse()
                .with_context(|| format!("table number must be numeric: {table}"))?;
            menu.select_table(number)?;
        }
        Ok(menu)
    }

    async fn menu(&self, args: MenuArgs) -> Result<()> {
        let mut menu = self.menu_view(&args.table).await?;
        let show = |menu: &MenuView<'_, NetworkHttpClient>| {
            print!(
                "{}",
                render::menu(&menu.filtered(args.category, &args.search), menu.categories())
            );
            print!(
                "{}",
                render::selection(menu.selected_room(), menu.selected_table())
            );
            print!("{}", render::cart(menu.cart()));
            if let Some(error) = menu.last_error() {
                eprintln!("! {error}");
            }
        };
        if !args.watch {
            show(&menu);
            return Ok(());
        }

        let (mut push, mut subscription) = self.push_client()?;
        let shutdown = ctrl_c_token();
        watch(&mut menu, &mut subscription, &shutdown, show).await;
        push.disconnect().await;
        Ok(())
    }

    async fn cart(&self, command: CartCommand) -> Result<()> {
        let filter = match &command {
            CartCommand::Submit { room, table } => TableFilter {
                room: room.clone(),
                table: table.map(|t| t.to_string()),
            },
            _ => TableFilter::default(),
        };
        let mut menu = self.menu_view(&filter).await?;
        match command {
            CartCommand::Show => {}
            CartCommand::Add { product } => {
                menu.add_unit(ProductId(product))?;
            }
            CartCommand::Remove { product } => {
                menu.remove_unit(ProductId(product))?;
            }
            CartCommand::Drop { product } => menu.remove_product(ProductId(product))?,
            CartCommand::Comment { product, text } => {
                menu.add_comment(ProductId(product), &text)?;
            }
            CartCommand::SetComment {
                product,
                index,
                text,
            } => menu.set_comment(ProductId(product), index, &text)?,
            CartCommand::DeleteComment { product, index } => {
                menu.delete_comment(ProductId(product), index)?
            }
            CartCommand::Submit { .. } => {
                let order = menu.submit(Utc::now()).await?;
                print!(
                    "{}",
                    render::selection(menu.selected_room(), menu.selected_table())
                );
                println!("Order sent with {} lines", order.lines.len());
                return Ok(());
            }
            CartCommand::Cancel => {
                menu.cancel()?;
                println!("Cart cleared");
                return Ok(());
            }
        }
        print!("{}", render::cart(menu.cart()));
        Ok(())
    }

    // ── Boards ──────────────────────────────────────────────────────

    fn push_client(&self) -> Result<(PushClient, PushSubscription)> {
        let mut push = PushClient::new(&self.config)?;
        let subscription = push.subscribe();
        push.connect();
        Ok((push, subscription))
    }

    async fn waiter_board(&self, filter: TableFilter, follow: bool) -> Result<()> {
        self.require(Route::WaiterBoard).await?;
        let mut view = WaiterView::new(&self.api);
        view.refresh().await;
        if let Some(error) = view.last_error() {
            bail!("Could not load the order board: {error}");
        }
        view.board_mut().set_room_filter(filter.room);
        view.board_mut()
            .set_table_filter(filter.table.map(TableNumber::new))?;

        if !follow {
            print!("{}", render::floor(view.board()));
            return Ok(());
        }

        let (mut push, mut subscription) = self.push_client()?;
        let shutdown = ctrl_c_token();
        watch(&mut view, &mut subscription, &shutdown, |v| {
            print!("{}", render::floor(v.board()));
            if let Some(error) = v.last_error() {
                eprintln!("! {error}");
            }
        })
        .await;
        push.disconnect().await;
        Ok(())
    }

    async fn station_board(&self, station: Station, follow: bool) -> Result<()> {
        self.require(station_route(station)).await?;
        let mut view = StationView::new(&self.api, station);
        view.refresh().await;
        if let Some(error) = view.last_error() {
            bail!("Could not load the {station} board: {error}");
        }
        print!("{}", render::station(view.board()));
        if !follow {
            return Ok(());
        }

        println!("Type a ticket number to serve it, q to quit");
        let (mut push, mut subscription) = self.push_client()?;
        let shutdown = ctrl_c_token();
        let mut input = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,

                received = subscription.recv() => match apply_received(&mut view, received).await {
                    Some(true) => print!("{}", render::station(view.board())),
                    Some(false) => {}
                    None => break,
                },

                line = input.next_line(), if stdin_open => match line {
                    Ok(Some(text)) => {
                        let text = text.trim();
                        if text.eq_ignore_ascii_case("q") {
                            break;
                        }
                        match text.parse::<usize>() {
                            Ok(index) => match view.serve(index).await {
                                Ok(outcome) => println!("{}", describe(outcome)),
                                Err(e) => eprintln!("! {e}"),
                            },
                            Err(_) => eprintln!("! not a ticket number: {text}"),
                        }
                        print!("{}", render::station(view.board()));
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!("stdin read failed: {e}");
                        stdin_open = false;
                    }
                },
            }
        }
        push.disconnect().await;
        Ok(())
    }

    async fn serve(&self, station: Station, index: usize) -> Result<()> {
        self.require(station_route(station)).await?;
        let mut view = StationView::new(&self.api, station);
        view.refresh().await;
        if let Some(error) = view.last_error() {
            bail!("Could not load the {station} board: {error}");
        }
        let outcome = view.serve(index).await?;
        println!("{}", describe(outcome));
        Ok(())
    }

    // ── Waiter operations ───────────────────────────────────────────

    async fn loaded_waiter_view(&self, table: &TableArgs) -> Result<WaiterView<'_, NetworkHttpClient>> {
        self.require(Route::WaiterBoard).await?;
        let mut view = WaiterView::new(&self.api);
        view.refresh().await;
        if let Some(error) = view.last_error() {
            bail!("Could not load the order board: {error}");
        }
        view.board_mut()
            .select_table(&table.room, TableNumber::new(table.table.as_str()))?;
        Ok(view)
    }

    async fn customer(&self, command: CustomerCommand) -> Result<()> {
        match command {
            CustomerCommand::Lookup { doc_type, document } => {
                self.require(Route::WaiterBoard).await?;
                let found = self.api.lookup_customer(doc_type, &document).await?;
                println!("{}", found.name);
            }
            CustomerCommand::Capture {
                table,
                doc_type,
                document,
            } => {
                let mut view = self.loaded_waiter_view(&table).await?;
                let found = self.api.lookup_customer(doc_type, &document).await?;
                let order = view.capture_customer(doc_type, &document).await?;
                println!("{} attached to order {order}", found.name);
            }
        }
        Ok(())
    }

    async fn order(&self, command: OrderCommand) -> Result<()> {
        self.require(Route::WaiterBoard).await?;
        match command {
            OrderCommand::Show { table, room } => {
                let number = TableNumber::new(table);
                let order = match room {
                    Some(room) => self.api.active_order_at(&number, &room).await?,
                    None => self.api.active_order_by_table(&number).await?,
                };
                print!("{}", render::order(&order));
            }
            OrderCommand::Delete { id } => {
                let mut view = WaiterView::new(&self.api);
                view.delete_order(OrderId(id)).await?;
                println!("Order {id} deleted");
                print!("{}", render::floor(view.board()));
            }
        }
        Ok(())
    }

    async fn pre_bill(&self, table: TableArgs) -> Result<()> {
        let view = self.loaded_waiter_view(&table).await?;
        let (mut push, mut subscription) = self.push_client()?;

        let wait = self.config.push.connect_timeout * 2;
        let connected = tokio::time::timeout(wait, async {
            loop {
                match subscription.recv().await {
                    Ok(Notification::Connected) => return true,
                    Ok(_) | Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                    Err(_) => return false,
                }
            }
        })
        .await
        .unwrap_or(false);
        if !connected {
            push.disconnect().await;
            bail!("Push channel unavailable, pre-bill not requested");
        }

        let result = view.print_pre_bill(&push).await;
        push.disconnect().await;
        result?;
        println!("Pre-bill requested for table {} in {}", table.table, table.room);
        Ok(())
    }

    // ── Back office ─────────────────────────────────────────────────

    async fn admin(&self, command: AdminCommand) -> Result<()> {
        match command {
            AdminCommand::Products(command) => {
                self.require(Route::Products).await?;
                match command {
                    ProductCommand::List => {
                        let products = self.api.list_products().await?;
                        let categories = self.api.list_categories().await?;
                        let refs: Vec<_> = products.iter().collect();
                        print!("{}", render::menu(&refs, &categories));
                    }
                    ProductCommand::Create(fields) => {
                        self.api.create_product(&product_input(fields)).await?;
                        println!("Product created");
                    }
                    ProductCommand::Update { id, fields } => {
                        self.api
                            .update_product(ProductId(id), &product_input(fields))
                            .await?;
                        println!("Product {id} updated");
                    }
                    ProductCommand::Delete { id } => {
                        self.api.delete_product(ProductId(id)).await?;
                        println!("Product {id} deleted");
                    }
                }
            }
            AdminCommand::Categories(command) => {
                self.require(Route::Categories).await?;
                match command {
                    NamedCommand::List => {
                        for c in self.api.list_categories().await? {
                            println!("{:>4}  {}", c.id, c.name);
                        }
                    }
                    NamedCommand::Create { name } => {
                        self.api.create_category(&CategoryInput { name }).await?
                    }
                    NamedCommand::Update { id, name } => {
                        self.api.update_category(id, &CategoryInput { name }).await?
                    }
                    NamedCommand::Delete { id } => self.api.delete_category(id).await?,
                }
            }
            AdminCommand::Areas(command) => {
                self.require(Route::Areas).await?;
                match command {
                    NamedCommand::List => {
                        for a in self.api.list_areas().await? {
                            println!("{:>4}  {}", a.id, a.name);
                        }
                    }
                    NamedCommand::Create { name } => self.api.create_area(&AreaInput { name }).await?,
                    NamedCommand::Update { id, name } => {
                        self.api.update_area(id, &AreaInput { name }).await?
                    }
                    NamedCommand::Delete { id } => self.api.delete_area(id).await?,
                }
            }
            AdminCommand::Rooms(command) => {
                self.require(Route::Rooms).await?;
                match command {
                    NamedCommand::List => {
                        for r in self.api.list_rooms().await? {
                            println!("{:>4}  {}", r.id, r.name);
                        }
                    }
                    NamedCommand::Create { name } => self.api.create_room(&RoomInput { name }).await?,
                    NamedCommand::Update { id, name } => {
                        self.api.update_room(id, &RoomInput { name }).await?
                    }
                    NamedCommand::Delete { id } => self.api.delete_room(id).await?,
                }
            }
            AdminCommand::Tables(command) => {
                self.require(Route::Tables).await?;
                match command {
                    TableCommand::List => {
                        for t in self.api.list_tables().await? {
                            println!("{:>4}  mesa {:<4} {}", t.id, t.number, t.room_label());
                        }
                    }
                    TableCommand::Create { number, room } => {
                        self.api
                            .create_table(&DiningTableInput {
                                number,
                                room_id: room,
                            })
                            .await?
                    }
                    TableCommand::Update { id, number, room } => {
                        self.api
                            .update_table(
                                id,
                                &DiningTableInput {
                                    number,
                                    room_id: room,
                                },
                            )
                            .await?
                    }
                    TableCommand::Delete { id } => self.api.delete_table(id).await?,
                }
            }
            AdminCommand::Users(command) => {
                self.require(Route::Users).await?;
                match command {
                    UserCommand::List => {
                        for u in self.api.list_users().await? {
                            let state = if u.active { "active" } else { "inactive" };
                            println!(
                                "{:>4}  {:<24} {:<28} {:<8} {}",
                                u.id,
                                u.name,
                                u.email,
                                u.role_name().unwrap_or("-"),
                                state
                            );
                        }
                    }
                    UserCommand::Activate { id } => self.api.set_user_active(id, true).await?,
                    UserCommand::Deactivate { id } => self.api.set_user_active(id, false).await?,
                }
            }
        }
        Ok(())
    }
}

fn product_input(fields: super::ProductFields) -> ProductCreate {
    ProductCreate {
        name: fields.name,
        price: fields.price,
        category_id: fields.category,
        area_id: fields.area,
    }
}

fn station_route(station: Station) -> Route {
    match station {
        Station::Bar => Route::BarBoard,
        Station::Grill => Route::GrillBoard,
    }
}

fn describe(outcome: ServeOutcome) -> String {
    match outcome {
        ServeOutcome::Partial {
            detail_id,
            served,
            total,
        } => format!("Line {detail_id}: {served} of {total} units served"),
        ServeOutcome::LineComplete { detail_id } => format!("Line {detail_id} served"),
    }
}

/// Cancelled on Ctrl-C
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    token
}
