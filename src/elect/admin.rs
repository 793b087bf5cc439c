//! Bootstrap and repair passes for the users file.
//!
//! The store enforces no uniqueness at write time, so any code path that
//! appends an account could leave a duplicate or misplaced admin row behind.
//! These passes re-establish the invariant: the reserved bootstrap admin is
//! the only Admin-role record and it sits first in the file. They are
//! idempotent and are run at startup and after registration events.

use log::{info, warn};

use crate::elect::models::*;
use crate::elect::store::{Backend, Store};
use crate::elect::ElectResult;

/// Creates the bootstrap admin if the users collection is empty.
pub fn initial_admin_setup<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    let accounts = store.load_accounts()?;
    if accounts.is_empty() {
        info!("No accounts found, creating the bootstrap admin account");
        store.save_accounts(&[default_admin()])?;
    }
    Ok(())
}

/// True iff the first record is exactly the bootstrap identity.
pub fn check_default_admin_at_top<B: Backend>(store: &Store<B>) -> ElectResult<bool> {
    let accounts = store.load_accounts()?;
    Ok(matches!(accounts.first(), Some(a) if a.is_default_admin()))
}

/// Rebuilds the users collection with a fresh bootstrap admin first.
///
/// Admin rows under a different username are dropped here; admin rows that
/// reuse the bootstrap username pass through and are left for
/// [`verify_and_clean_admins`], which also checks the password.
pub fn enforce_default_admin_top<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    if check_default_admin_at_top(store)? {
        return Ok(());
    }
    warn!("Bootstrap admin missing or misplaced, rebuilding the users file");

    let accounts = store.load_accounts()?;
    let mut fixed: Vec<Account> = Vec::with_capacity(accounts.len() + 1);
    fixed.push(default_admin());
    for a in accounts {
        if a.role == Role::Admin && a.username != DEFAULT_ADMIN_USERNAME {
            continue;
        }
        fixed.push(a);
    }
    store.save_accounts(&fixed)
}

/// Full repair: bootstrap admin first, every other Admin-role row removed,
/// non-admin rows untouched and in their original order.
pub fn verify_and_clean_admins<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    enforce_default_admin_top(store)?;

    let accounts = store.load_accounts()?;
    let mut filtered: Vec<Account> = Vec::with_capacity(accounts.len());
    let mut kept_admin = false;
    for a in accounts {
        if a.role == Role::Admin {
            if !kept_admin && a.is_default_admin() {
                filtered.push(a);
                kept_admin = true;
            }
        } else {
            filtered.push(a);
        }
    }
    store.save_accounts(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elect::store::mem_store;

    fn rep(name: &str) -> Account {
        Account {
            username: name.to_string(),
            password: "pw1234".to_string(),
            role: Role::Representative,
        }
    }

    fn student(name: &str) -> Account {
        Account {
            username: name.to_string(),
            password: "pw1234".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn bootstrap_creates_exactly_one_admin() {
        let mut store = mem_store();
        initial_admin_setup(&mut store).unwrap();
        assert_eq!(store.load_accounts().unwrap(), vec![default_admin()]);

        // A second run changes nothing.
        initial_admin_setup(&mut store).unwrap();
        assert_eq!(store.load_accounts().unwrap(), vec![default_admin()]);
    }

    #[test]
    fn bootstrap_leaves_a_populated_file_alone() {
        let mut store = mem_store();
        store.save_accounts(&[student("stu1")]).unwrap();
        initial_admin_setup(&mut store).unwrap();
        assert_eq!(store.load_accounts().unwrap(), vec![student("stu1")]);
    }

    #[test]
    fn check_recognizes_only_the_exact_identity() {
        let mut store = mem_store();
        assert!(!check_default_admin_at_top(&store).unwrap());

        store.save_accounts(&[default_admin()]).unwrap();
        assert!(check_default_admin_at_top(&store).unwrap());

        let mut wrong_password = default_admin();
        wrong_password.password = "guess".to_string();
        store.save_accounts(&[wrong_password]).unwrap();
        assert!(!check_default_admin_at_top(&store).unwrap());

        store
            .save_accounts(&[student("stu1"), default_admin()])
            .unwrap();
        assert!(!check_default_admin_at_top(&store).unwrap());
    }

    #[test]
    fn enforce_prepends_and_drops_impostor_admins() {
        let mut store = mem_store();
        let impostor = Account {
            username: "mallory".to_string(),
            password: "pw1234".to_string(),
            role: Role::Admin,
        };
        store
            .save_accounts(&[student("stu1"), impostor, rep("rep1")])
            .unwrap();
        enforce_default_admin_top(&mut store).unwrap();

        let accounts = store.load_accounts().unwrap();
        assert_eq!(accounts[0], default_admin());
        assert_eq!(accounts[1], student("stu1"));
        assert_eq!(accounts[2], rep("rep1"));
        assert_eq!(accounts.len(), 3);
    }

    #[test]
    fn enforce_is_a_no_op_when_already_valid() {
        let mut store = mem_store();
        store
            .save_accounts(&[default_admin(), student("stu1")])
            .unwrap();
        enforce_default_admin_top(&mut store).unwrap();
        assert_eq!(
            store.load_accounts().unwrap(),
            vec![default_admin(), student("stu1")]
        );
    }

    #[test]
    fn clean_leaves_exactly_one_canonical_admin_first() {
        let mut store = mem_store();
        let mut stale = default_admin();
        stale.password = "old".to_string();
        store
            .save_accounts(&[
                student("stu1"),
                stale,
                rep("rep1"),
                default_admin(),
                student("stu2"),
            ])
            .unwrap();
        verify_and_clean_admins(&mut store).unwrap();

        let accounts = store.load_accounts().unwrap();
        let admins: Vec<&Account> = accounts.iter().filter(|a| a.role == Role::Admin).collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(accounts[0], default_admin());
        assert!(accounts.iter().any(|a| a.username == "stu1"));
        assert!(accounts.iter().any(|a| a.username == "stu2"));
        assert!(accounts.iter().any(|a| a.username == "rep1"));
    }

    #[test]
    fn clean_is_idempotent() {
        let mut store = mem_store();
        store
            .save_accounts(&[student("stu1"), rep("rep1"), default_admin()])
            .unwrap();
        verify_and_clean_admins(&mut store).unwrap();
        let once = store.load_accounts().unwrap();
        verify_and_clean_admins(&mut store).unwrap();
        let twice = store.load_accounts().unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice[0], default_admin());
    }
}
