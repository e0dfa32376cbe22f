/*!
 * Resource Traits
 * Lifecycle driver shared by all tile resources
 */

use super::lifecycle::{Lifecycle, ResourceState, Transition};
use crate::core::errors::RscResult;
use crate::core::types::{ModuleKind, TileLocation};
use crate::device::DeviceHandle;
use std::sync::Arc;
use tracing::{debug, warn};

/// A hardware resource bound to one tile module.
///
/// Implementors embed a [`Lifecycle`] and supply the `do_*` hooks; the
/// provided methods own every state check and transition. Hooks run only
/// after the check passed and must leave no side effects when they fail.
pub trait TileResource: Sized {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn device(&self) -> &Arc<DeviceHandle>;

    /// Acquire allocator capacity, all or nothing
    #[doc(hidden)]
    fn do_reserve(&mut self) -> RscResult<()>;

    /// Give back everything `do_reserve` acquired
    #[doc(hidden)]
    fn do_release(&mut self);

    /// Program hardware, all or nothing
    #[doc(hidden)]
    fn do_start(&mut self) -> RscResult<()>;

    /// Undo what `do_start` programmed
    #[doc(hidden)]
    fn do_stop(&mut self) -> RscResult<()>;

    #[inline]
    fn state(&self) -> ResourceState {
        self.lifecycle().state()
    }

    #[inline]
    fn location(&self) -> Option<TileLocation> {
        self.lifecycle().location()
    }

    #[inline]
    fn module(&self) -> Option<ModuleKind> {
        self.lifecycle().module()
    }

    /// Configured -> Reserved
    fn reserve(&mut self) -> RscResult<()> {
        self.drive(Transition::Reserve, Self::do_reserve)
    }

    /// Reserved -> Initialized; never fails from Reserved
    fn release(&mut self) -> RscResult<()> {
        self.drive(Transition::Release, |rsc| {
            rsc.do_release();
            Ok(())
        })
    }

    /// Reserved -> Started
    fn start(&mut self) -> RscResult<()> {
        self.drive(Transition::Start, Self::do_start)
    }

    /// Started -> Reserved
    fn stop(&mut self) -> RscResult<()> {
        self.drive(Transition::Stop, Self::do_stop)
    }

    /// Run `hook` under the state check for `transition`, advancing on success
    #[doc(hidden)]
    fn drive<F>(&mut self, transition: Transition, hook: F) -> RscResult<()>
    where
        F: FnOnce(&mut Self) -> RscResult<()>,
    {
        let span = self.device().span().clone();
        let _entered = span.enter();

        self.lifecycle().check(transition)?;
        hook(self)?;
        self.lifecycle_mut().advance(transition);
        Ok(())
    }

    /// Stop and release whatever is still held; used on drop.
    ///
    /// Allocator capacity is always returned, even when the hardware could
    /// not be stopped.
    fn teardown(&mut self) {
        if self.state() == ResourceState::Started {
            if let Err(e) = self.stop() {
                let span = self.device().span().clone();
                let _entered = span.enter();
                warn!(kind = %self.lifecycle().kind(), error = %e, "Stop during teardown failed, releasing slots anyway");
                self.do_release();
                self.lifecycle_mut().advance(Transition::Release);
                return;
            }
        }
        if self.state() == ResourceState::Reserved {
            debug!(kind = %self.lifecycle().kind(), "Releasing resource on teardown");
            if let Err(e) = self.release() {
                warn!(kind = %self.lifecycle().kind(), error = %e, "Release during teardown failed");
            }
        }
    }
}
