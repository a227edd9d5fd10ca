use std::{
    io::{self, Read},
    os::fd::{AsRawFd, RawFd},
    time::Duration,
};

/// Waits for `fd` to become readable, giving up after `budget`. A hung-up
/// pipe also reports readable; the caller distinguishes by draining.
pub(crate) fn poll_readable(fd: RawFd, budget: Duration) -> io::Result<bool> {
    let mut pollfd = libc::pollfd { fd, events: libc::POLLIN, revents: 0 };
    let timeout = budget.as_millis().clamp(1, i32::MAX as u128) as libc::c_int;
    let ready = unsafe { libc::poll(&mut pollfd, 1, timeout) };
    if ready < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(ready > 0)
}

/// Number of bytes currently buffered in the pipe behind `fd`.
pub(crate) fn available_bytes(fd: RawFd) -> io::Result<usize> {
    let mut count: libc::c_int = 0;
    if unsafe { libc::ioctl(fd, libc::FIONREAD, &mut count) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(count.max(0) as usize)
}

/// Reads exactly the bytes the pipe already holds, so the call never blocks.
/// Returns an empty string at end of stream.
pub(crate) fn drain<R: Read + AsRawFd>(pipe: &mut R) -> io::Result<String> {
    let pending = available_bytes(pipe.as_raw_fd())?;
    let mut buffer = vec![0u8; pending];
    if pending > 0 {
        pipe.read_exact(&mut buffer)?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
