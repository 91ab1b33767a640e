//! Timer source for retrying services.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

use mayfly::retry::Sleep;

/// Browser timer under `hydrate`; resolves immediately elsewhere.
#[must_use]
pub fn sleep() -> Sleep {
    #[cfg(feature = "hydrate")]
    {
        Rc::new(|delay: Duration| -> Pin<Box<dyn Future<Output = ()>>> { Box::pin(gloo_timers::future::sleep(delay)) })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Rc::new(|_: Duration| -> Pin<Box<dyn Future<Output = ()>>> { Box::pin(async {}) })
    }
}

/// Today's date in UTC.
#[must_use]
pub fn today() -> time::Date {
    time::OffsetDateTime::now_utc().date()
}
