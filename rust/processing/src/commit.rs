// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commit units: scoped, all-or-nothing mutation phases.
//!
//! A [`CommitUnit`] opens a named unit on the host when created and rolls it
//! back when dropped without [`commit`](CommitUnit::commit). Every exit path
//! of a phase (early `?` returns, cancellation) therefore discards partial
//! work, while units committed earlier stay committed.

use crate::ports::Transactional;
use std::ops::{Deref, DerefMut};
use wallhole_core::Result;

/// Guard over an open mutation unit of `D`.
pub struct CommitUnit<'d, D: Transactional + ?Sized> {
    document: &'d mut D,
    name: String,
    committed: bool,
}

impl<'d, D: Transactional + ?Sized> CommitUnit<'d, D> {
    /// Open a unit named `name` on `document`.
    pub fn begin(document: &'d mut D, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        document.begin(&name)?;
        tracing::debug!(unit = %name, "Opened commit unit");
        Ok(Self {
            document,
            name,
            committed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Commit the unit. On failure the guard still rolls back on drop.
    pub fn commit(mut self) -> Result<()> {
        self.document.commit()?;
        self.committed = true;
        tracing::debug!(unit = %self.name, "Committed unit");
        Ok(())
    }
}

impl<D: Transactional + ?Sized> Deref for CommitUnit<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.document
    }
}

impl<D: Transactional + ?Sized> DerefMut for CommitUnit<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.document
    }
}

impl<D: Transactional + ?Sized> Drop for CommitUnit<'_, D> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::warn!(unit = %self.name, "Rolling back uncommitted unit");
            self.document.rollback();
        }
    }
}
