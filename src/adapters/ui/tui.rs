//! Implements InputPort. Inquire-based interactive screens.
//!
//! Main menu -> gated screens (dashboard, categories, products, orders,
//! users). The category browser walks the built tree with an expanded-id
//! set; the product form drives the cascading category selector. Every
//! screen action catches its own failure and surfaces a transient notice;
//! a 401 anywhere clears the session and drops back to login.

use crate::domain::selection::{CategoryCascade, MAX_LEVELS};
use crate::domain::tree::{flatten, CategoryNode};
use crate::domain::{
    Category, CategoryDraft, DomainError, Order, OrderStatus, PackOption, Product, ProductDraft,
    Stock, StockStatus,
};
use crate::ports::InputPort;
use crate::usecases::{
    AuthGate, AuthService, CategoryService, GateDecision, OrderService, ProductService,
    UserService, MAX_SUBCATEGORY_DEPTH,
};
use async_trait::async_trait;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::ExecutableCommand;
use indicatif::ProgressBar;
use inquire::error::InquireError;
use inquire::ui::{RenderConfig, Styled};
use inquire::{Confirm, CustomType, Password, Select, Text};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::future::Future;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

const SCREEN_DASHBOARD: &str = "dashboard";
const SCREEN_CATEGORIES: &str = "categories";
const SCREEN_PRODUCTS: &str = "products";
const SCREEN_ORDERS: &str = "orders";
const SCREEN_USERS: &str = "users";

const BACK: &str = "Back";

/// Applies the inquire prompt theme. Called once from init_ui.
pub fn apply_theme() {
    let mut cfg = RenderConfig::default_colored();
    cfg.prompt_prefix = Styled::new("»").with_fg(inquire::ui::Color::LightCyan);
    cfg.answered_prompt_prefix = Styled::new("✔").with_fg(inquire::ui::Color::LightGreen);
    inquire::set_global_render_config(cfg);
}

/// TUI adapter. Inquire prompts over the application services.
pub struct TuiInputPort {
    auth: Arc<AuthService>,
    gate: AuthGate,
    categories: Arc<CategoryService>,
    products: Arc<ProductService>,
    orders: Arc<OrderService>,
    users: Arc<UserService>,
}

impl TuiInputPort {
    pub fn new(
        auth: Arc<AuthService>,
        categories: Arc<CategoryService>,
        products: Arc<ProductService>,
        orders: Arc<OrderService>,
        users: Arc<UserService>,
    ) -> Self {
        let gate = AuthGate::new(Arc::clone(&auth));
        Self {
            auth,
            gate,
            categories,
            products,
            orders,
            users,
        }
    }

    /// Guard, then run the screen. A redirect runs the login flow and, on
    /// success, continues to the originally requested screen. A 401 during
    /// the screen clears the session and loops back through the gate.
    async fn open(&self, screen: &str) -> Result<(), DomainError> {
        loop {
            let decision = with_spinner("Checking session...", self.gate.guard(screen)).await;
            let target = match decision {
                GateDecision::Proceed => screen.to_string(),
                GateDecision::RedirectToLogin => {
                    if !self.login_flow().await? {
                        return Ok(());
                    }
                    self.gate
                        .take_return_to()
                        .await
                        .unwrap_or_else(|| screen.to_string())
                }
            };

            match self.dispatch(&target).await {
                Ok(()) => return Ok(()),
                Err(DomainError::Unauthorized) => {
                    self.auth.handle_unauthorized().await;
                    alert("Session expired — please log in again.");
                    // The gate now redirects to login and keeps the screen
                    // for the post-login return.
                }
                Err(e) => {
                    alert(&e.to_string());
                    return Ok(());
                }
            }
        }
    }

    async fn dispatch(&self, screen: &str) -> Result<(), DomainError> {
        match screen {
            SCREEN_DASHBOARD => self.dashboard_screen().await,
            SCREEN_CATEGORIES => self.categories_screen().await,
            SCREEN_PRODUCTS => self.products_screen().await,
            SCREEN_ORDERS => self.orders_screen().await,
            SCREEN_USERS => self.users_screen().await,
            other => Err(DomainError::Input(format!("unknown screen {other}"))),
        }
    }

    async fn login_flow(&self) -> Result<bool, DomainError> {
        say("Administrator login required.");
        loop {
            let Some(email) = opt(Text::new("Email:").prompt())? else {
                return Ok(false);
            };
            let Some(password) = opt(Password::new("Password:").without_confirmation().prompt())?
            else {
                return Ok(false);
            };
            let result =
                with_spinner("Signing in...", self.auth.login(email.trim(), &password)).await;
            match result {
                Ok(user) => {
                    say(&format!("Logged in as {}", user.email));
                    return Ok(true);
                }
                Err(e) => {
                    alert(&e.to_string());
                    let Some(retry) = opt(Confirm::new("Try again?").with_default(true).prompt())?
                    else {
                        return Ok(false);
                    };
                    if !retry {
                        return Ok(false);
                    }
                }
            }
        }
    }

    // ── Dashboard ────────────────────────────────────────────────────────

    async fn dashboard_screen(&self) -> Result<(), DomainError> {
        with_spinner("Loading dashboard...", async {
            self.categories.refresh().await?;
            self.products.refresh().await?;
            self.orders.refresh().await
        })
        .await?;

        if let Some(user) = self.auth.current_user().await {
            say(&format!("Welcome back, {}.", display_name(&user.name, &user.email)));
        }
        let (total, roots, subs) = self.categories.counts().await;
        println!("  Categories:    {total} ({roots} top-level, {subs} subcategories)");
        println!("  Products:      {}", self.products.count().await);
        println!("  Orders:        {}", self.orders.count().await);
        Ok(())
    }

    // ── Categories ───────────────────────────────────────────────────────

    async fn categories_screen(&self) -> Result<(), DomainError> {
        with_spinner("Loading categories...", self.categories.refresh()).await?;
        // Fully collapsed on entry.
        let mut expanded: HashSet<String> = HashSet::new();

        loop {
            let tree = self.categories.tree().await;
            let (total, roots, subs) = self.categories.counts().await;
            say(&format!(
                "Category hierarchy — {total} total, {roots} top-level, {subs} subcategories"
            ));

            let rows = visible_rows(&tree, &expanded);
            let mut options: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
            options.push("+ Add root category".to_string());
            options.push("Refresh".to_string());
            options.push(BACK.to_string());

            let Some(selected) =
                opt(Select::new("Select a category or action", options.clone())
                    .with_page_size(18)
                    .prompt())?
            else {
                return Ok(());
            };

            match selected.as_str() {
                BACK => return Ok(()),
                "Refresh" => {
                    with_spinner("Refreshing...", self.categories.refresh()).await?;
                }
                "+ Add root category" => {
                    if let Some(draft) = self.category_form(None, None).await? {
                        with_spinner("Saving...", self.categories.add(draft)).await?;
                        say("Category created successfully");
                    }
                }
                _ => {
                    let Some(idx) = options.iter().position(|o| *o == selected) else {
                        continue;
                    };
                    let row = rows[idx].clone();
                    self.category_node_menu(&row, &mut expanded).await?;
                }
            }
        }
    }

    async fn category_node_menu(
        &self,
        row: &CategoryRow,
        expanded: &mut HashSet<String>,
    ) -> Result<(), DomainError> {
        let mut actions: Vec<&str> = Vec::new();
        if row.has_children {
            actions.push(if row.expanded { "Collapse" } else { "Expand" });
        }
        // Only nodes shallower than 2 levels below root can grow children.
        if row.depth < MAX_SUBCATEGORY_DEPTH {
            actions.push("Add subcategory");
        }
        actions.push("Edit");
        actions.push("Delete");
        actions.push(BACK);

        let Some(action) = opt(Select::new(&row.name, actions).prompt())? else {
            return Ok(());
        };

        match action {
            "Expand" => {
                expanded.insert(row.id.clone());
            }
            "Collapse" => {
                expanded.remove(&row.id);
            }
            "Add subcategory" => {
                if let Some(draft) = self.category_form(None, Some(row.id.clone())).await? {
                    with_spinner("Saving...", self.categories.add(draft)).await?;
                    say("Subcategory created successfully");
                }
            }
            "Edit" => {
                let tree = self.categories.tree().await;
                let Some(current) = find_category(&tree, &row.id) else {
                    alert("Category no longer exists; refresh and retry.");
                    return Ok(());
                };
                if let Some(draft) = self.category_form(Some(&current), None).await? {
                    with_spinner("Saving...", self.categories.update(&row.id, draft)).await?;
                    say("Category updated successfully");
                }
            }
            "Delete" => {
                let Some(confirmed) = opt(Confirm::new(&format!(
                    "Are you sure you want to delete \"{}\"?",
                    row.name
                ))
                .with_default(false)
                .prompt())?
                else {
                    return Ok(());
                };
                if confirmed {
                    with_spinner("Deleting...", self.categories.delete(&row.id)).await?;
                    expanded.remove(&row.id);
                    say("Category deleted successfully");
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Add/edit form. `parent_prefill` (add-subcategory) skips the parent
    /// prompt; otherwise the parent is picked from the flat dropdown.
    async fn category_form(
        &self,
        existing: Option<&Category>,
        parent_prefill: Option<String>,
    ) -> Result<Option<CategoryDraft>, DomainError> {
        let Some(name) = required_text("Name:", existing.map(|c| c.name.as_str()))? else {
            return Ok(None);
        };

        let slug_default = existing
            .map(|c| c.slug.clone())
            .unwrap_or_else(|| slugify(&name));
        let Some(slug) = required_text("Slug:", Some(&slug_default))? else {
            return Ok(None);
        };

        let description_default = existing.and_then(|c| c.description.clone()).unwrap_or_default();
        let Some(description) =
            opt(Text::new("Description:").with_default(&description_default).prompt())?
        else {
            return Ok(None);
        };
        let description = {
            let trimmed = description.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let parent_id = match parent_prefill {
            Some(id) => Some(id),
            None => {
                let Some(parent_id) =
                    self.pick_parent(existing.and_then(|c| c.parent_id())).await?
                else {
                    return Ok(None);
                };
                parent_id
            }
        };

        Ok(Some(CategoryDraft {
            name,
            slug,
            description,
            parent_id,
        }))
    }

    /// Parent dropdown over the flattened tree. Outer None = cancelled,
    /// inner None = top-level.
    async fn pick_parent(
        &self,
        current: Option<&str>,
    ) -> Result<Option<Option<String>>, DomainError> {
        const NO_PARENT: &str = "(none — top level)";
        let flat = self.categories.flat().await;

        let mut labels = vec![NO_PARENT.to_string()];
        labels.extend(
            flat.iter()
                .map(|(_, name, depth)| format!("{}{}", "— ".repeat(*depth), name)),
        );

        let cursor = current
            .and_then(|id| flat.iter().position(|(fid, _, _)| fid == id))
            .map(|i| i + 1)
            .unwrap_or(0);

        let Some(selected) = opt(Select::new("Parent category:", labels.clone())
            .with_starting_cursor(cursor)
            .with_page_size(18)
            .prompt())?
        else {
            return Ok(None);
        };

        if selected == NO_PARENT {
            return Ok(Some(None));
        }
        let id = labels
            .iter()
            .position(|l| *l == selected)
            .and_then(|i| flat.get(i - 1))
            .map(|(id, _, _)| id.clone());
        Ok(Some(id))
    }

    // ── Products ─────────────────────────────────────────────────────────

    async fn products_screen(&self) -> Result<(), DomainError> {
        with_spinner("Loading products...", async {
            self.products.refresh().await?;
            // The form's cascading selector needs a current tree.
            self.categories.refresh().await
        })
        .await?;

        loop {
            let products = self.products.list().await;
            let mut options: Vec<String> = products.iter().map(product_label).collect();
            options.push("+ Add product".to_string());
            options.push("Refresh".to_string());
            options.push(BACK.to_string());

            let Some(selected) = opt(Select::new(
                &format!("Products ({})", products.len()),
                options.clone(),
            )
            .with_page_size(18)
            .prompt())?
            else {
                return Ok(());
            };

            match selected.as_str() {
                BACK => return Ok(()),
                "Refresh" => {
                    with_spinner("Refreshing...", self.products.refresh()).await?;
                }
                "+ Add product" => {
                    if let Some(draft) = self.product_form(None).await? {
                        with_spinner("Creating...", self.products.create(draft)).await?;
                        say("Product created successfully");
                    }
                }
                _ => {
                    let Some(idx) = options.iter().position(|o| *o == selected) else {
                        continue;
                    };
                    self.product_menu(&products[idx]).await?;
                }
            }
        }
    }

    async fn product_menu(&self, product: &Product) -> Result<(), DomainError> {
        let Some(action) = opt(Select::new(
            &product.name,
            vec!["View details", "Edit", "Delete", BACK],
        )
        .prompt())?
        else {
            return Ok(());
        };

        match action {
            "View details" => print_product(product),
            "Edit" => {
                if let Some(draft) = self.product_form(Some(product)).await? {
                    with_spinner("Saving...", self.products.update(&product.id, draft)).await?;
                    say("Product updated successfully");
                }
            }
            "Delete" => {
                let Some(confirmed) = opt(Confirm::new(&format!(
                    "Are you sure you want to delete \"{}\"?",
                    product.name
                ))
                .with_default(false)
                .prompt())?
                else {
                    return Ok(());
                };
                if confirmed {
                    with_spinner("Deleting...", self.products.delete(&product.id)).await?;
                    say("Product deleted successfully");
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn product_form(
        &self,
        existing: Option<&Product>,
    ) -> Result<Option<ProductDraft>, DomainError> {
        let Some(name) = required_text("Product name:", existing.map(|p| p.name.as_str()))? else {
            return Ok(None);
        };

        // Slug derived from the name unless the operator overrides it.
        let slug_default = existing
            .map(|p| p.slug.clone())
            .unwrap_or_else(|| slugify(&name));
        let Some(slug) = required_text("Slug:", Some(&slug_default))? else {
            return Ok(None);
        };

        let Some(sku) = required_text("SKU:", existing.map(|p| p.sku.as_str()))? else {
            return Ok(None);
        };

        let Some(brand) = opt(Text::new("Brand:")
            .with_default(existing.map(|p| p.brand.as_str()).unwrap_or(""))
            .prompt())?
        else {
            return Ok(None);
        };

        let Some(short_description) = opt(Text::new("Short description:")
            .with_default(existing.map(|p| p.short_description.as_str()).unwrap_or(""))
            .prompt())?
        else {
            return Ok(None);
        };

        let Some(description) =
            required_text("Description:", existing.map(|p| p.description.as_str()))?
        else {
            return Ok(None);
        };

        let Some(base_price) =
            money("Base price:", existing.map(|p| p.base_price))?
        else {
            return Ok(None);
        };

        let Some(primary_category) = self.pick_category_path().await? else {
            return Ok(None);
        };

        let Some(pack_options) =
            self.pack_options_form(existing.map(|p| p.pack_options.as_slice()))?
        else {
            return Ok(None);
        };

        let Some(images) = images_form(existing.map(|p| p.images.as_slice()))? else {
            return Ok(None);
        };

        let Some(level) = opt(CustomType::<u32>::new("Stock level:")
            .with_default(existing.map(|p| p.stock.level).unwrap_or(0))
            .prompt())?
        else {
            return Ok(None);
        };
        let status_labels: Vec<&str> = StockStatus::ALL.iter().map(|s| s.label()).collect();
        let Some(status_label) = opt(Select::new("Stock status:", status_labels).prompt())? else {
            return Ok(None);
        };
        let status = StockStatus::ALL
            .into_iter()
            .find(|s| s.label() == status_label)
            .unwrap_or(StockStatus::InStock);

        let Some(meta_title) = opt(Text::new("Meta title (SEO):")
            .with_default(existing.and_then(|p| p.meta_title.as_deref()).unwrap_or(""))
            .prompt())?
        else {
            return Ok(None);
        };
        let Some(meta_description) = opt(Text::new("Meta description (SEO):")
            .with_default(
                existing
                    .and_then(|p| p.meta_description.as_deref())
                    .unwrap_or(""),
            )
            .prompt())?
        else {
            return Ok(None);
        };

        let Some(is_featured) = opt(Confirm::new("Featured product?")
            .with_default(existing.map(|p| p.is_featured).unwrap_or(false))
            .prompt())?
        else {
            return Ok(None);
        };
        let Some(is_active) = opt(Confirm::new("Active?")
            .with_default(existing.map(|p| p.is_active).unwrap_or(true))
            .prompt())?
        else {
            return Ok(None);
        };

        Ok(Some(ProductDraft {
            sku,
            slug,
            name,
            brand: brand.trim().to_string(),
            description,
            short_description: short_description.trim().to_string(),
            base_price,
            primary_category,
            pack_options,
            images,
            stock: Stock { level, status },
            is_featured,
            is_active,
            meta_title: none_if_blank(&meta_title),
            meta_description: none_if_blank(&meta_description),
        }))
    }

    /// The cascading selector: level by level, each offering the children
    /// of the previous pick, capped at 3 levels. Outer None = cancelled,
    /// inner = deepest picked id (None when left unassigned).
    async fn pick_category_path(&self) -> Result<Option<Option<String>>, DomainError> {
        const UNASSIGNED: &str = "(leave unassigned)";
        const DONE: &str = "(done — use selection so far)";

        let tree = self.categories.tree().await;
        let mut cascade = CategoryCascade::new();

        for level in 0..MAX_LEVELS {
            let options = cascade.options_at(&tree, level).to_vec();
            if options.is_empty() {
                // Leaf reached: this level's selector is omitted.
                break;
            }

            let mut labels: Vec<String> = options.iter().map(|n| n.name().to_string()).collect();
            labels.push(if level == 0 { UNASSIGNED } else { DONE }.to_string());

            let Some(selected) = opt(Select::new(
                &format!("Category (level {}):", level + 1),
                labels.clone(),
            )
            .prompt())?
            else {
                return Ok(None);
            };

            if selected == UNASSIGNED || selected == DONE {
                break;
            }
            let Some(idx) = labels.iter().position(|l| *l == selected) else {
                break;
            };
            cascade.select(level, options[idx].id());
        }

        let path = cascade.path_names(&tree).join(" > ");
        if !path.is_empty() {
            say(&format!("Category path: {path}"));
        }
        Ok(Some(cascade.primary_category().map(str::to_string)))
    }

    /// At least one pack option is required.
    fn pack_options_form(
        &self,
        existing: Option<&[PackOption]>,
    ) -> Result<Option<Vec<PackOption>>, DomainError> {
        if let Some(current) = existing {
            let summary: Vec<String> = current.iter().map(pack_label).collect();
            say(&format!("Current pack options: {}", summary.join(", ")));
            let keep = opt(Confirm::new("Keep current pack options?")
                .with_default(true)
                .prompt())?;
            match keep {
                Some(true) => return Ok(Some(current.to_vec())),
                Some(false) => {}
                None => return Ok(None),
            }
        }

        let mut packs: Vec<PackOption> = Vec::new();
        loop {
            let Some(unit) = required_text("Pack unit (e.g. kg, piece, box):", None)? else {
                return if packs.is_empty() { Ok(None) } else { Ok(Some(packs)) };
            };
            let Some(quantity) = positive_int("Pack quantity:")? else {
                return Ok(None);
            };
            let Some(price) = money("Pack price:", None)? else {
                return Ok(None);
            };
            packs.push(PackOption {
                unit,
                quantity,
                price,
            });

            let Some(more) = opt(Confirm::new("Add another pack option?")
                .with_default(false)
                .prompt())?
            else {
                break;
            };
            if !more {
                break;
            }
        }
        if packs.is_empty() {
            alert("At least one pack option is required.");
            return Ok(None);
        }
        Ok(Some(packs))
    }

    // ── Orders ───────────────────────────────────────────────────────────

    async fn orders_screen(&self) -> Result<(), DomainError> {
        with_spinner("Loading orders...", self.orders.refresh()).await?;

        loop {
            let orders = self.orders.list().await;
            let mut options: Vec<String> = orders.iter().map(order_label).collect();
            options.push("Refresh".to_string());
            options.push(BACK.to_string());

            let Some(selected) = opt(Select::new(
                &format!("Orders ({})", orders.len()),
                options.clone(),
            )
            .with_page_size(18)
            .prompt())?
            else {
                return Ok(());
            };

            match selected.as_str() {
                BACK => return Ok(()),
                "Refresh" => {
                    with_spinner("Refreshing...", self.orders.refresh()).await?;
                }
                _ => {
                    let Some(idx) = options.iter().position(|o| *o == selected) else {
                        continue;
                    };
                    self.order_menu(&orders[idx]).await?;
                }
            }
        }
    }

    async fn order_menu(&self, order: &Order) -> Result<(), DomainError> {
        let Some(action) = opt(Select::new(
            &order.order_id,
            vec!["View details", "Change status", "Edit notes", "Delete", BACK],
        )
        .prompt())?
        else {
            return Ok(());
        };

        match action {
            "View details" => print_order(order),
            "Change status" => {
                let labels: Vec<String> =
                    OrderStatus::KNOWN.iter().map(|s| s.to_string()).collect();
                let cursor = OrderStatus::KNOWN
                    .iter()
                    .position(|s| *s == order.status)
                    .unwrap_or(0);
                let Some(selected) = opt(Select::new("New status:", labels)
                    .with_starting_cursor(cursor)
                    .prompt())?
                else {
                    return Ok(());
                };
                let status = OrderStatus::KNOWN
                    .into_iter()
                    .find(|s| s.to_string() == selected)
                    .unwrap_or(OrderStatus::Pending);
                with_spinner("Updating...", self.orders.set_status(&order.id, status)).await?;
                say("Order status updated");
            }
            "Edit notes" => {
                let Some(notes) = opt(Text::new("Notes:")
                    .with_default(order.notes.as_deref().unwrap_or(""))
                    .prompt())?
                else {
                    return Ok(());
                };
                with_spinner("Updating...", self.orders.set_notes(&order.id, notes)).await?;
                say("Order notes updated");
            }
            "Delete" => {
                let Some(confirmed) = opt(Confirm::new(&format!(
                    "Delete order {}? This cannot be undone.",
                    order.order_id
                ))
                .with_default(false)
                .prompt())?
                else {
                    return Ok(());
                };
                if confirmed {
                    with_spinner("Deleting...", self.orders.delete(&order.id)).await?;
                    say("Order deleted");
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────────

    async fn users_screen(&self) -> Result<(), DomainError> {
        with_spinner("Loading users...", self.users.refresh()).await?;

        loop {
            let users = self.users.list().await;
            let mut options: Vec<String> = users
                .iter()
                .map(|u| {
                    format!(
                        "{} — {} — {}",
                        u.email,
                        display_name(&u.name, &u.email),
                        if u.is_active { "active" } else { "disabled" }
                    )
                })
                .collect();
            options.push("Refresh".to_string());
            options.push(BACK.to_string());

            let Some(selected) = opt(Select::new(
                &format!("Users ({})", users.len()),
                options.clone(),
            )
            .with_page_size(18)
            .prompt())?
            else {
                return Ok(());
            };

            match selected.as_str() {
                BACK => return Ok(()),
                "Refresh" => {
                    with_spinner("Refreshing...", self.users.refresh()).await?;
                }
                _ => {
                    let Some(idx) = options.iter().position(|o| *o == selected) else {
                        continue;
                    };
                    let user = users[idx].clone();
                    let toggle = if user.is_active {
                        "Disable account"
                    } else {
                        "Enable account"
                    };
                    let Some(action) =
                        opt(Select::new(&user.email, vec![toggle, "Delete", BACK]).prompt())?
                    else {
                        continue;
                    };
                    match action {
                        "Delete" => {
                            let Some(confirmed) =
                                opt(Confirm::new(&format!("Delete user {}?", user.email))
                                    .with_default(false)
                                    .prompt())?
                            else {
                                continue;
                            };
                            if confirmed {
                                with_spinner("Deleting...", self.users.delete(&user.id)).await?;
                                say("User deleted");
                            }
                        }
                        a if a == toggle => {
                            with_spinner("Updating...", self.users.toggle_status(&user.id))
                                .await?;
                            say("User status updated");
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let Some(choice) = opt(Select::new(
                "Main menu",
                vec![
                    "Dashboard",
                    "Categories",
                    "Products",
                    "Orders",
                    "Users",
                    "Logout",
                    "Quit",
                ],
            )
            .prompt())?
            else {
                return Ok(());
            };

            match choice {
                "Quit" => return Ok(()),
                "Logout" => {
                    if self.auth.is_authenticated().await {
                        with_spinner("Logging out...", self.auth.logout()).await?;
                        say("Logged out.");
                    } else {
                        say("Not logged in.");
                    }
                }
                "Dashboard" => self.open(SCREEN_DASHBOARD).await?,
                "Categories" => self.open(SCREEN_CATEGORIES).await?,
                "Products" => self.open(SCREEN_PRODUCTS).await?,
                "Orders" => self.open(SCREEN_ORDERS).await?,
                "Users" => self.open(SCREEN_USERS).await?,
                _ => {}
            }
        }
    }
}

// ── Tree rendering (pure; the prompt layer merely walks this) ───────────

/// One visible line of the category browser.
#[derive(Debug, Clone)]
struct CategoryRow {
    id: String,
    name: String,
    label: String,
    depth: usize,
    has_children: bool,
    expanded: bool,
}

/// Walk the forest, skipping the subtrees of collapsed nodes. Leaves get no
/// expand marker.
fn visible_rows(tree: &[CategoryNode], expanded: &HashSet<String>) -> Vec<CategoryRow> {
    fn walk(
        nodes: &[CategoryNode],
        expanded: &HashSet<String>,
        depth: usize,
        out: &mut Vec<CategoryRow>,
    ) {
        for node in nodes {
            let has_children = !node.children.is_empty();
            let is_expanded = expanded.contains(node.id());
            let marker = if !has_children {
                "  "
            } else if is_expanded {
                "▾ "
            } else {
                "▸ "
            };
            out.push(CategoryRow {
                id: node.id().to_string(),
                name: node.name().to_string(),
                label: format!(
                    "{}{}{} ({})",
                    "  ".repeat(depth),
                    marker,
                    node.name(),
                    node.category.slug
                ),
                depth,
                has_children,
                expanded: is_expanded,
            });
            if has_children && is_expanded {
                walk(&node.children, expanded, depth + 1, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(tree, expanded, 0, &mut out);
    out
}

fn find_category(tree: &[CategoryNode], id: &str) -> Option<Category> {
    flatten(tree)
        .into_iter()
        .find(|n| n.id() == id)
        .map(|n| n.category.clone())
}

// ── Form helpers ────────────────────────────────────────────────────────

/// Lowercase, strip non-alphanumerics, spaces to dashes, collapse dashes.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress leading dashes
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if (ch == ' ' || ch == '-') && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn none_if_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn display_name<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if name.trim().is_empty() { fallback } else { name }
}

/// Text prompt that loops until non-empty (required-field check only).
/// None = cancelled.
fn required_text(prompt: &str, default: Option<&str>) -> Result<Option<String>, DomainError> {
    loop {
        let mut text = Text::new(prompt);
        if let Some(default) = default {
            text = text.with_default(default);
        }
        let Some(value) = opt(text.prompt())? else {
            return Ok(None);
        };
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
        alert("This field is required.");
    }
}

/// Non-negative money prompt. None = cancelled.
fn money(prompt: &str, default: Option<Decimal>) -> Result<Option<Decimal>, DomainError> {
    loop {
        let mut input = CustomType::<Decimal>::new(prompt);
        if let Some(default) = default {
            input = input.with_default(default);
        }
        let Some(value) = opt(input.prompt())? else {
            return Ok(None);
        };
        if !value.is_sign_negative() {
            return Ok(Some(value));
        }
        alert("Price must not be negative.");
    }
}

/// Positive integer prompt. None = cancelled.
fn positive_int(prompt: &str) -> Result<Option<u32>, DomainError> {
    loop {
        let Some(value) = opt(CustomType::<u32>::new(prompt).with_default(1).prompt())? else {
            return Ok(None);
        };
        if value > 0 {
            return Ok(Some(value));
        }
        alert("Quantity must be at least 1.");
    }
}

/// Collect image URLs; blank entries are filtered before submission.
fn images_form(existing: Option<&[String]>) -> Result<Option<Vec<String>>, DomainError> {
    if let Some(current) = existing {
        if !current.is_empty() {
            say(&format!("Current images: {}", current.join(", ")));
            let keep = opt(Confirm::new("Keep current images?").with_default(true).prompt())?;
            match keep {
                Some(true) => return Ok(Some(current.to_vec())),
                Some(false) => {}
                None => return Ok(None),
            }
        }
    }

    let mut images = Vec::new();
    loop {
        let Some(url) = opt(Text::new("Image URL (leave empty to finish):").prompt())? else {
            return Ok(None);
        };
        let trimmed = url.trim();
        if trimmed.is_empty() {
            break;
        }
        images.push(trimmed.to_string());
    }
    Ok(Some(images))
}

// ── Labels & detail views ───────────────────────────────────────────────

fn product_label(p: &Product) -> String {
    format!(
        "{} — {} — {} — {}",
        p.name,
        p.sku,
        p.base_price,
        if p.is_active { "active" } else { "inactive" }
    )
}

fn pack_label(pack: &PackOption) -> String {
    format!("{} x{} @ {}", pack.unit, pack.quantity, pack.price)
}

fn order_label(o: &Order) -> String {
    format!(
        "{} — {} — {} — {}",
        o.order_id, o.customer_info.name, o.order_total, o.status
    )
}

fn print_product(p: &Product) {
    println!("  {} ({})", p.name, p.sku);
    println!("  Slug:        {}", p.slug);
    if !p.brand.is_empty() {
        println!("  Brand:       {}", p.brand);
    }
    println!("  Base price:  {}", p.base_price);
    println!(
        "  Category:    {}",
        p.primary_category.as_deref().unwrap_or("(unassigned)")
    );
    println!(
        "  Stock:       {} ({})",
        p.stock.level,
        p.stock.status.label()
    );
    for pack in &p.pack_options {
        println!("  Pack:        {}", pack_label(pack));
    }
    for image in &p.images {
        println!("  Image:       {}", image);
    }
    println!(
        "  Flags:       featured={} active={}",
        p.is_featured, p.is_active
    );
}

fn print_order(o: &Order) {
    println!("  Order:       {}", o.order_id);
    println!("  Customer:    {} <{}>", o.customer_info.name, o.customer_info.email);
    if let Some(company) = &o.customer_info.company_name {
        println!("  Company:     {}", company);
    }
    if let Some(addr) = &o.customer_info.shipping_address {
        println!(
            "  Ships to:    {}, {}, {} {}",
            addr.line1, addr.city, addr.postal_code, addr.country
        );
    }
    for item in &o.items {
        let pack = item.pack.as_ref().map(pack_label).unwrap_or_default();
        println!(
            "  Item:        {} x{} {}",
            item.name.as_deref().unwrap_or(&item.sku),
            item.quantity,
            pack
        );
    }
    println!("  Total:       {}", o.order_total);
    println!("  Status:      {}", o.status);
    println!("  Notes:       {}", o.notes.as_deref().unwrap_or("(none)"));
    if let Some(created) = o.created_at {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M"));
    }
}

// ── Prompt plumbing ─────────────────────────────────────────────────────

/// Esc/Ctrl-C become None (back/cancel); real failures become DomainError.
fn opt<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

/// Spinner while an in-flight request suspends the current action. The
/// process stays responsive; nothing is cancelled on our side.
async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

fn say(message: &str) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(Color::Green));
    let _ = out.execute(Print(format!("{message}\r\n")));
    let _ = out.execute(ResetColor);
}

fn alert(message: &str) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(Color::Red));
    let _ = out.execute(Print(format!("{message}\r\n")));
    let _ = out.execute(ResetColor);
}
