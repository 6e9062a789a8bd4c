//! Movement sinks.
//!
//! [`LogSink`] only records the movement; [`X11Sink`] (feature `x11`) moves
//! the real pointer through the XTEST extension.

use jiggler_core::MoveSink;
use tracing::debug;

/// Sink used when no platform backend is compiled in.
#[derive(Debug, Default)]
pub struct LogSink {
    /// Net displacement so far. Stays within one step of the origin.
    offset: (i64, i64),
}

impl MoveSink for LogSink {
    fn inject_move(&mut self, dx: i32, dy: i32) -> bool {
        self.offset.0 += i64::from(dx);
        self.offset.1 += i64::from(dy);
        debug!(dx, dy, offset = ?self.offset, "pointer move");
        true
    }
}

#[cfg(feature = "x11")]
pub use self::x11::X11Sink;

#[cfg(feature = "x11")]
mod x11 {
    use jiggler_core::MoveSink;
    use tracing::{info, warn};
    use x11rb::connection::Connection;
    use x11rb::protocol::xproto::{Window, MOTION_NOTIFY_EVENT};
    use x11rb::protocol::xtest::ConnectionExt as XTestExt;
    use x11rb::rust_connection::RustConnection;
    use x11rb::CURRENT_TIME;

    /// Relative pointer motion through XTEST.
    pub struct X11Sink {
        conn: RustConnection,
        root: Window,
    }

    impl X11Sink {
        /// Connects to `$DISPLAY` and checks that XTEST is available.
        ///
        /// # Errors
        /// Returns an error if the display cannot be opened or lacks XTEST.
        pub fn connect() -> Result<Self, Box<dyn std::error::Error>> {
            let (conn, screen_num) = x11rb::connect(None)?;
            let root = conn
                .setup()
                .roots
                .get(screen_num)
                .map(|screen| screen.root)
                .ok_or("X11 screen not found")?;
            let version = conn.xtest_get_version(2, 2)?.reply()?;
            info!(
                screen_num,
                xtest = %format!("{}.{}", version.major_version, version.minor_version),
                "connected to x11"
            );
            Ok(Self { conn, root })
        }

        fn send(&self, dx: i32, dy: i32) -> Result<(), Box<dyn std::error::Error>> {
            let dx = dx.clamp(i16::MIN.into(), i16::MAX.into()) as i16;
            let dy = dy.clamp(i16::MIN.into(), i16::MAX.into()) as i16;
            // detail = 1 makes the motion relative to the current position.
            self.conn
                .xtest_fake_input(MOTION_NOTIFY_EVENT, 1, CURRENT_TIME, self.root, dx, dy, 0)?;
            self.conn.flush()?;
            Ok(())
        }
    }

    impl MoveSink for X11Sink {
        fn inject_move(&mut self, dx: i32, dy: i32) -> bool {
            match self.send(dx, dy) {
                Ok(()) => true,
                Err(err) => {
                    warn!(%err, "xtest motion failed");
                    false
                }
            }
        }
    }
}

/// Picks the compiled-in backend.
///
/// # Errors
/// Returns an error if the platform backend cannot be created.
pub fn open() -> Result<Box<dyn MoveSink>, Box<dyn std::error::Error>> {
    #[cfg(feature = "x11")]
    {
        Ok(Box::new(X11Sink::connect()?))
    }
    #[cfg(not(feature = "x11"))]
    {
        Ok(Box::new(LogSink::default()))
    }
}
