//! Some utility functions that don't need to be part of the public release.

use std::sync::LockResult;

//Unwrap a LockResult to get the guard even when poisoned.
//
//The std mutexes in this crate only guard plain counters, and every critical section finishes
//its update before anything can panic, so a poisoned lock still holds a sound value.
//
//Source for the name: http://bulbapedia.bulbagarden.net/wiki/Guts_(Ability)
pub fn guts<T>(res: LockResult<T>) -> T {
    match res {
        Ok(guard) => guard,
        Err(poison) => poison.into_inner(),
    }
}
