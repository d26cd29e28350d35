// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Multi-kind entity queries
//!
//! A query intersects the live-id sets of up to four component pools. The
//! smallest pool drives the iteration and the others act as membership
//! filters, so the cost is proportional to the rarest requested kind.

use crate::ecs::{Component, ComponentStorage, Entity, EntityId, StoreId};
use std::any::TypeId;
use std::collections::HashSet;

/// Set of component kinds a query matches on
///
/// Implemented for tuples of one to four [`Component`] types.
pub trait QueryKinds {
    /// Type ids of the requested kinds
    fn kinds() -> Vec<TypeId>;
}

macro_rules! impl_query_kinds {
    ($($kind:ident),+) => {
        impl<$($kind: Component),+> QueryKinds for ($($kind,)+) {
            fn kinds() -> Vec<TypeId> {
                vec![$(TypeId::of::<$kind>()),+]
            }
        }
    };
}

impl_query_kinds!(A);
impl_query_kinds!(A, B);
impl_query_kinds!(A, B, C);
impl_query_kinds!(A, B, C, D);

/// Lazy iterator over the active entities that carry every requested kind
///
/// Holds a shared borrow of the world, so the world cannot be mutated while
/// the query is alive. Collect it first when the loop body needs to mutate.
pub struct Query<'w> {
    store: StoreId,
    active: &'w HashSet<EntityId>,
    driver: std::slice::Iter<'w, EntityId>,
    filters: Vec<&'w dyn ComponentStorage>,
}

impl<'w> Query<'w> {
    /// Build a query from the pools of every requested kind.
    /// `None` in `pools` means a kind has never been stored, so nothing can match.
    pub(crate) fn new(
        store: StoreId,
        active: &'w HashSet<EntityId>,
        pools: Vec<Option<&'w dyn ComponentStorage>>,
    ) -> Self {
        let mut present: Vec<&'w dyn ComponentStorage> = match pools.into_iter().collect() {
            Some(present) => present,
            None => Vec::new(),
        };
        present.sort_by_key(|pool| pool.live_count());

        if present.is_empty() {
            let empty: &'w [EntityId] = &[];
            return Query {
                store,
                active,
                driver: empty.iter(),
                filters: Vec::new(),
            };
        }

        let driver = present.remove(0).live_ids().iter();
        Query {
            store,
            active,
            driver,
            filters: present,
        }
    }
}

impl<'w> Iterator for Query<'w> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        for &id in self.driver.by_ref() {
            if self.active.contains(&id) && self.filters.iter().all(|pool| pool.contains(id)) {
                return Some(Entity::new(id, self.store));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.driver.len()))
    }
}
