use crate::settings::{user_config_path, AppConfig, INSTALL_ROOT_ENV};
use std::path::Path;
use vnodectl_core::{locate_executable, Error};

pub async fn run(app: &AppConfig) -> anyhow::Result<()> {
    println!("🏥 vnodectl Doctor\n");

    let mut all_ok = true;

    check_config_files();
    all_ok &= check_install_root(app);
    let executable_ok = check_executable(app);
    all_ok &= executable_ok;
    if executable_ok {
        all_ok &= check_console(app).await;
    }

    println!();
    if all_ok {
        println!("✅ All checks passed! netutil is reachable.");
    } else {
        println!("⚠️  Some checks failed. Please fix the issues above.");
        std::process::exit(1);
    }

    Ok(())
}

fn check_config_files() {
    print!("Checking config files... ");

    let local = Path::new("config/local.toml");
    let user = user_config_path();
    match (local.exists(), user.as_deref().filter(|p| p.exists())) {
        (false, None) => println!("ℹ️  Using built-in defaults"),
        (has_local, user) => {
            println!("✅ Found");
            if has_local {
                println!("  ✅ {}", local.display());
            }
            if let Some(path) = user {
                println!("  ✅ {}", path.display());
            }
        }
    }
}

fn check_install_root(app: &AppConfig) -> bool {
    print!("Checking install root... ");

    match &app.netutil.install_root {
        Some(root) if root.is_dir() => {
            println!("✅ {}", root.display());
            true
        }
        Some(root) => {
            println!("❌ {} is not a directory", root.display());
            false
        }
        None if app.netutil.binary.is_absolute() => {
            println!("ℹ️  Not set (binary path is absolute)");
            true
        }
        None => {
            println!("❌ Not set");
            println!(
                "  Set {} or VNODECTL_NETUTIL__INSTALL_ROOT",
                INSTALL_ROOT_ENV
            );
            false
        }
    }
}

fn check_executable(app: &AppConfig) -> bool {
    print!("Checking netutil executable... ");

    match locate_executable(&app.netutil) {
        Ok(path) => {
            println!("✅ {}", path.display());
            true
        }
        Err(Error::ExecutableNotFound(path)) => {
            println!("❌ {} is missing or not executable", path.display());
            false
        }
        Err(e) => {
            println!("❌ {}", e);
            false
        }
    }
}

async fn check_console(app: &AppConfig) -> bool {
    print!("Checking console prompt... ");

    match vnodectl_pty::PtyConsole::spawn(&app.netutil).await {
        Ok(console) => {
            let pid = console.pid();
            let ctl = vnodectl_core::Controller::new(console, app.netutil.controller_options());
            match ctl.close().await {
                Ok(()) => println!("✅ Prompt '{}' seen (pid {:?})", app.netutil.prompt, pid),
                Err(e) => println!("⚠️  Started, but did not exit cleanly: {}", e),
            }
            true
        }
        Err(e) => {
            println!("❌ {}", e);
            println!(
                "  Check netutil.prompt (currently '{}') and netutil.timeout_secs",
                app.netutil.prompt
            );
            false
        }
    }
}
