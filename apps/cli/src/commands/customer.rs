//! Customer command - customers and their construction projects.

use chrono::Utc;
use clap::{Args, Subcommand};
use geruest_core::{Customer, Project};
use uuid::Uuid;

use super::{require, Context};
use crate::error::{CliError, CliResult};
use crate::output;

/// Arguments for the customer command.
#[derive(Args)]
pub struct CustomerArgs {
    #[command(subcommand)]
    command: CustomerCommand,
}

#[derive(Subcommand)]
enum CustomerCommand {
    /// List all customers
    List,

    /// Add a customer
    Add(AddArgs),

    /// List a customer's projects
    Projects(ProjectsArgs),

    /// Add a project ("Bauvorhaben") to a customer
    AddProject(AddProjectArgs),
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    /// Company name for business customers
    #[arg(long)]
    company: Option<String>,

    #[arg(long)]
    street: Option<String>,

    #[arg(long)]
    house_number: Option<String>,

    #[arg(long)]
    postal_code: Option<String>,

    #[arg(long)]
    city: Option<String>,
}

#[derive(Args)]
struct ProjectsArgs {
    /// Customer id
    customer: String,
}

#[derive(Args)]
struct AddProjectArgs {
    /// Customer id
    customer: String,

    /// Project name
    name: String,

    /// Construction site address
    #[arg(long)]
    site: Option<String>,
}

/// Run the customer command.
pub async fn run(args: CustomerArgs, ctx: &Context) -> CliResult<()> {
    let db = ctx.open_db().await?;

    let result = match args.command {
        CustomerCommand::List => {
            let customers = db.customers().list().await?;
            if ctx.json {
                output::print_json(&customers)
            } else {
                for c in &customers {
                    println!(
                        "{}  {:<32} {}",
                        c.id,
                        c.display_name(),
                        c.address_line().unwrap_or_default()
                    );
                }
                Ok(())
            }
        }
        CustomerCommand::Add(args) => {
            let customer = Customer {
                id: Uuid::new_v4().to_string(),
                company: args.company.filter(|c| !c.trim().is_empty()),
                first_name: args.first_name,
                last_name: args.last_name,
                street: args.street,
                house_number: args.house_number,
                postal_code: args.postal_code,
                city: args.city,
                created_at: Utc::now(),
            };
            if customer.last_name.trim().is_empty() && customer.company.is_none() {
                return Err(CliError::validation("last name or company is required"));
            }
            db.customers().insert(&customer).await?;
            tracing::info!(id = %customer.id, "Customer added");

            if ctx.json {
                output::print_json(&customer)
            } else {
                println!("{}  {}", customer.id, customer.display_name());
                Ok(())
            }
        }
        CustomerCommand::Projects(args) => {
            let customer = require(
                db.customers().get_by_id(&args.customer).await?,
                "Customer",
                &args.customer,
            )?;
            let projects = db.projects().list_for_customer(&customer.id).await?;
            if ctx.json {
                output::print_json(&projects)
            } else {
                println!("{}", customer.display_name());
                if projects.is_empty() {
                    println!("  keine Bauvorhaben");
                }
                for p in &projects {
                    println!(
                        "  {}  {:<32} {}",
                        p.id,
                        p.name,
                        p.site_address.as_deref().unwrap_or("")
                    );
                }
                Ok(())
            }
        }
        CustomerCommand::AddProject(args) => {
            let project = Project {
                id: Uuid::new_v4().to_string(),
                customer_id: args.customer,
                name: args.name,
                site_address: args.site,
                created_at: Utc::now(),
            };
            if project.name.trim().is_empty() {
                return Err(CliError::validation("project name is required"));
            }
            db.projects().insert(&project).await?;
            tracing::info!(id = %project.id, customer = %project.customer_id, "Project added");

            if ctx.json {
                output::print_json(&project)
            } else {
                println!("{}  {}", project.id, project.name);
                Ok(())
            }
        }
    };

    db.close().await;
    result
}
