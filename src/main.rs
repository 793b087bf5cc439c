use clap::Parser;
use log::{error, warn};
use snafu::ErrorCompat;

mod args;
mod elect;

use crate::args::Args;
use crate::elect::admin;
use crate::elect::menus;
use crate::elect::store::{Backend, FsBackend, Resource, Store};
use crate::elect::sync;
use crate::elect::ElectResult;

/// Gets the data files into a usable state before any menu is shown:
/// all five resources exist, the bootstrap admin invariant holds and the
/// manifestos match the current representative roster.
fn startup<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    for res in Resource::ALL {
        store.ensure_exists(res)?;
    }
    admin::initial_admin_setup(store)?;
    admin::verify_and_clean_admins(store)?;
    sync::sync_manifestos_with_reps(store)?;
    Ok(())
}

fn run(args: &Args) -> ElectResult<()> {
    let mut store = Store::new(FsBackend::new(args.data_dir.as_str()));
    startup(&mut store)?;

    menus::welcome();
    loop {
        match menus::main_prompt()? {
            0 => break,
            1 => {
                if let Err(e) = menus::register(&mut store) {
                    warn!("Registration failed: {}", e);
                    println!("[ERROR] {}", e);
                }
            }
            2 => {
                if let Err(e) = menus::login(&mut store, args.out.as_deref()) {
                    warn!("Session ended with an error: {}", e);
                    println!("[ERROR] {}", e);
                }
            }
            _ => unreachable!(),
        }
    }
    println!("\nExiting, goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elect::models::*;
    use crate::elect::store::mem_store;

    #[test]
    fn startup_bootstraps_a_fresh_store() {
        let mut store = mem_store();
        startup(&mut store).unwrap();
        assert_eq!(store.load_accounts().unwrap(), vec![default_admin()]);
        assert_eq!(store.load_manifestos().unwrap(), vec![]);
        assert_eq!(store.load_votes().unwrap(), vec![]);
    }

    #[test]
    fn startup_repairs_and_syncs_an_existing_store() {
        let mut store = mem_store();
        let rep = Account {
            username: "alice".to_string(),
            password: "pw1234".to_string(),
            role: Role::Representative,
        };
        let impostor = Account {
            username: "mallory".to_string(),
            password: "pw1234".to_string(),
            role: Role::Admin,
        };
        store.save_accounts(&[rep.clone(), impostor]).unwrap();

        startup(&mut store).unwrap();

        let accounts = store.load_accounts().unwrap();
        assert_eq!(accounts, vec![default_admin(), rep]);
        assert_eq!(
            store.load_manifestos().unwrap(),
            vec![Manifesto {
                rep_username: "alice".to_string(),
                text: ManifestoText::Pending,
            }]
        );
    }
}

fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    if let Err(e) = run(&args) {
        error!("Fatal error: {}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
