use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| default_drive_path().to_string());

    // O_NONBLOCK lets the open succeed even while the drive is still
    // spinning up; the TOC ioctls themselves stay blocking.
    let device = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(&path)?;

    let header = cdrom_toc::read_toc_header(&device)?;
    println!("{path}: tracks {}-{}", header.first_track, header.last_track);

    for track in header.first_track..=header.last_track {
        let addr = cdrom_toc::read_toc_entry(&device, track)?;
        println!(
            "track {track:2} starts at {:02}:{:02}.{:02}",
            addr.minute, addr.second, addr.frame
        );
    }

    let leadout = cdrom_toc::read_leadout(&device)?;
    println!(
        "leadout at {:02}:{:02}.{:02}",
        leadout.minute, leadout.second, leadout.frame
    );

    Ok(())
}

#[cfg(target_os = "linux")]
fn default_drive_path() -> &'static str {
    "/dev/cdrom"
}

#[cfg(any(target_os = "solaris", target_os = "illumos"))]
fn default_drive_path() -> &'static str {
    "/dev/rdsk/c1t0d0s2"
}

#[cfg(target_os = "freebsd")]
fn default_drive_path() -> &'static str {
    "/dev/cd0"
}
