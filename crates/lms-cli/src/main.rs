use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use lms_cli::accounts;
use lms_db::{PgDirectory, connect, run_migrations};
use lms_models::{CreateStudentDto, CreateUserDto, Role};

#[derive(Parser)]
#[command(name = "lms-cli")]
#[command(about = "LMS CLI - Administrative tools for the LMS portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a staff account (use --role SuperAdmin to bootstrap)
    CreateStaff {
        #[arg(short = 'f', long)]
        fname: Option<String>,

        #[arg(short = 'l', long)]
        lname: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// One of SuperAdmin, Admin, Principal, ClassTeacher, Teacher,
        /// Mentor, Librarian, Counselor, Staff
        #[arg(short = 'r', long, default_value = "SuperAdmin")]
        role: Role,

        #[arg(long, default_value = "-")]
        gender: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create a student whose guardians can sign in to the parent portal
    CreateStudent {
        #[arg(short = 'f', long)]
        fname: String,

        #[arg(short = 'l', long)]
        lname: String,

        #[arg(long)]
        father_phone: Option<String>,

        #[arg(long)]
        mother_phone: Option<String>,

        /// Standard (grade)
        #[arg(long)]
        std: String,

        /// Division (section)
        #[arg(long)]
        div: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Print a bcrypt hash, for seeding credentials by hand
    HashPassword {
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::CreateStaff {
            fname,
            lname,
            email,
            phone,
            role,
            gender,
            password,
        } => {
            let dto = CreateUserDto {
                fname: prompt_or(fname, "First name")?,
                mname: None,
                lname: prompt_or(lname, "Last name")?,
                email: prompt_or(email, "Email address")?,
                phone: prompt_or(phone, "Phone")?,
                password: password_or_prompt(password)?,
                role,
                gender,
                dob: None,
                address: None,
            };

            let directory = open_directory().await?;
            let user = accounts::create_staff(&directory, dto).await?;

            println!("\n✅ Staff account created successfully!");
            println!("   Id: {}", user.id);
            println!("   Email: {}", user.email);
            println!("   Name: {}", user.full_name());
            println!("   Role: {}", user.role);
        }
        Commands::CreateStudent {
            fname,
            lname,
            father_phone,
            mother_phone,
            std,
            div,
            password,
        } => {
            let dto = CreateStudentDto {
                fname,
                lname,
                father_phone,
                mother_phone,
                std,
                div,
                password: password_or_prompt(password)?,
            };

            let directory = open_directory().await?;
            let student = accounts::create_student(&directory, dto).await?;

            println!("\n✅ Student created successfully!");
            println!("   Id: {}", student.student_id);
            println!("   Class: {}-{}", student.std, student.div);
        }
        Commands::HashPassword { password } => {
            let hash = lms_core::hash_password(&password_or_prompt(password)?)
                .map_err(|e| e.error)?;
            println!("{hash}");
        }
    }

    Ok(())
}

async fn open_directory() -> Result<PgDirectory> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(PgDirectory::new(pool))
}

fn prompt_or(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password"),
    }
}
