//! Authentication commands, including the interactive OTP flow.
//!
//! The OTP flow drives the pure countdown state machine with a one-second
//! tokio interval: the prompt keeps accepting OTP attempts while counting,
//! and `resend` is only honored once the countdown has expired.

use std::time::Duration;

use clap::Subcommand;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use medicart_client::api::{AuthSession, OtpVerifyOutcome, RegisterRequest, VerifyOtpRequest};
use medicart_client::{GatewayError, OtpCountdown};
use medicart_core::{Email, EmailError, UserId};

use crate::context::Context;

/// Errors specific to the auth commands.
#[derive(Debug, Error)]
pub enum AuthCommandError {
    /// Gateway interaction failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Email failed local validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Input stream closed before the flow finished.
    #[error("input closed before OTP was verified")]
    InputClosed,

    /// Reading from stdin failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account (pre-OTP)
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        full_name: String,

        /// Contact phone (10 digits)
        #[arg(long)]
        phone: String,
    },
    /// Send an OTP and verify it interactively
    Otp {
        /// Email to verify
        #[arg(short, long)]
        email: String,

        /// Registration: display name (with phone and password, completes
        /// registration on verification)
        #[arg(long)]
        full_name: Option<String>,

        /// Registration: contact phone
        #[arg(long)]
        phone: Option<String>,

        /// Registration: password
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show the current user's profile
    Whoami,
    /// List all users (admin only)
    Users,
    /// Delete a user (admin only)
    DeleteUser {
        /// User id
        id: i64,
    },
    /// Change the current user's password
    ChangePassword {
        /// Current password
        #[arg(long)]
        old: String,

        /// New password
        #[arg(long)]
        new: String,
    },
    /// Destroy the local session
    Logout,
}

pub async fn run(action: AuthAction, ctx: &Context) -> Result<(), AuthCommandError> {
    match action {
        AuthAction::Login { email, password } => {
            let email = Email::parse(&email)?;
            let session = ctx.client().login(&email, &password).await?;
            print_session(&session);
        }
        AuthAction::Register {
            email,
            password,
            full_name,
            phone,
        } => {
            // Validate at the boundary before any request goes out
            let _ = Email::parse(&email)?;
            let outcome = ctx
                .client()
                .register(&RegisterRequest {
                    email: email.clone(),
                    password,
                    full_name,
                    phone,
                })
                .await?;
            match outcome {
                Some(session) => print_session(&session),
                None => println!(
                    "Account created for {email}. Verify it with: medicart auth otp -e {email}"
                ),
            }
        }
        AuthAction::Otp {
            email,
            full_name,
            phone,
            password,
        } => {
            let email = Email::parse(&email)?;
            let outcome = otp_flow(ctx, &email, full_name, phone, password).await?;
            match outcome {
                OtpVerifyOutcome::Authenticated(session) => print_session(&session),
                OtpVerifyOutcome::Verified { email, .. } => {
                    println!("Email verified: {}", email.unwrap_or_default());
                }
            }
        }
        AuthAction::Whoami => {
            let user = ctx.client().current_user().await?;
            println!(
                "{} <{}> phone {} roles {:?}",
                user.full_name.unwrap_or_default(),
                user.email.unwrap_or_default(),
                user.phone.unwrap_or_default(),
                user.roles,
            );
        }
        AuthAction::Users => {
            let users = ctx.client().list_users().await?;
            for user in &users {
                println!(
                    "{:<6} {:<30} {:<24} {:?}",
                    user.id.unwrap_or_default(),
                    user.email.as_deref().unwrap_or("-"),
                    user.full_name.as_deref().unwrap_or("-"),
                    user.roles,
                );
            }
            println!("{} users", users.len());
        }
        AuthAction::DeleteUser { id } => {
            ctx.client().delete_user(UserId::new(id)).await?;
            println!("User {id} deleted");
        }
        AuthAction::ChangePassword { old, new } => {
            let response = ctx.client().change_password(&old, &new).await?;
            println!("{}", response.message.unwrap_or_else(|| "Password changed".to_owned()));
        }
        AuthAction::Logout => {
            ctx.client().logout()?;
            println!("Logged out");
        }
    }
    Ok(())
}

/// Send an OTP, then prompt until it verifies. A one-second interval ticks
/// the countdown; `resend` re-issues the OTP once the countdown allows it.
async fn otp_flow(
    ctx: &Context,
    email: &Email,
    full_name: Option<String>,
    phone: Option<String>,
    password: Option<String>,
) -> Result<OtpVerifyOutcome, AuthCommandError> {
    let sent = ctx.client().send_otp(email).await?;
    announce_otp(sent.demo_otp.as_deref());

    let mut countdown = OtpCountdown::start();
    let mut expired_announced = false;

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately; consume it so ticks line up with
    // elapsed seconds
    interval.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Enter the OTP (or 'resend' after the countdown expires):");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                countdown = countdown.tick();
                if countdown.can_resend() && !expired_announced {
                    println!("OTP window expired - type 'resend' to request a new one");
                    expired_announced = true;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Err(AuthCommandError::InputClosed);
                };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                if input.eq_ignore_ascii_case("resend") {
                    if countdown.can_resend() {
                        let resent = ctx.client().send_otp(email).await?;
                        announce_otp(resent.demo_otp.as_deref());
                        countdown = countdown.restart_after_resend();
                        expired_announced = false;
                    } else {
                        println!("Resend available in {}s", countdown.remaining_secs());
                    }
                    continue;
                }

                let request = VerifyOtpRequest {
                    email: email.as_str().to_owned(),
                    otp: input.to_owned(),
                    full_name: full_name.clone(),
                    phone: phone.clone(),
                    password: password.clone(),
                };
                match ctx.client().verify_otp(&request).await {
                    Ok(outcome) => return Ok(outcome),
                    Err(err) => println!("Verification failed ({err}) - try again"),
                }
            }
        }
    }
}

fn announce_otp(demo_otp: Option<&str>) {
    match demo_otp {
        // Email delivery is mocked outside production; the gateway returns
        // the OTP so the flow stays testable
        Some(otp) => println!("OTP (demo mode): {otp}"),
        None => println!("OTP sent - check your email"),
    }
}

fn print_session(session: &AuthSession) {
    println!(
        "Logged in as {} ({}) -> {}",
        session
            .user_id
            .map_or_else(|| "?".to_owned(), |id| id.to_string()),
        session.role,
        session.redirect_target,
    );
}
