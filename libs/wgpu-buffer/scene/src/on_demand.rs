// This file is part of Slate.
//
// Slate is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Slate is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Slate.  If not, see <http://www.gnu.org/licenses/>.

/// Monotonic edit counter. Items bump their generation on every mutation
/// that invalidates derived data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Generation(u64);

impl Generation {
    pub fn new() -> Self {
        Self(1)
    }

    pub fn bump(&mut self) {
        self.0 += 1;
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::new()
    }
}

/// A derived value rebuilt lazily when the owning item's generation moves
/// past the one it was built at. `once` values are built a single time and
/// never refreshed, for derivations that cannot change.
#[derive(Debug)]
pub struct OnDemand<T> {
    value: Option<T>,
    built_at: u64,
    once: bool,
}

impl<T> OnDemand<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            built_at: 0,
            once: false,
        }
    }

    pub fn once() -> Self {
        Self {
            value: None,
            built_at: 0,
            once: true,
        }
    }

    pub fn get_or_build(&mut self, generation: Generation, build: impl FnOnce() -> T) -> &T {
        let rebuild = match &self.value {
            None => true,
            Some(_) => !self.once && self.built_at < generation.get(),
        };
        if rebuild {
            log::trace!("rebuilding on-demand value at generation {}", generation.get());
            self.built_at = generation.get();
            self.value = Some(build());
        }
        match &self.value {
            Some(value) => value,
            None => unreachable!("on-demand value was just built"),
        }
    }
}

impl<T> Default for OnDemand<T> {
    fn default() -> Self {
        Self::new()
    }
}
