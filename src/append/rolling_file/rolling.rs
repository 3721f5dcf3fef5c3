// Copyright 2024 FastLabs Developers
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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::Zoned;

use crate::Error;
use crate::append::rolling_file::Rotation;
use crate::append::rolling_file::clock::Clock;

const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A writer for time-rotated log files.
///
/// Files are named `<app_name>_<stamp>.log` where the stamp is the start of the current rotation
/// period (`%Y%m%d` for daily rotation). A link named `<app_name>.log` always points at the file
/// currently written, and files older than the maximum age are deleted whenever a new file is
/// opened.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: File,
}

impl RollingFileWriter {
    /// Creates a new [`RollingFileWriterBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::append::rolling_file::RollingFileWriter;
    ///
    /// let builder = RollingFileWriter::builder();
    /// ```
    #[must_use]
    pub fn builder() -> RollingFileWriterBuilder {
        RollingFileWriterBuilder::new()
    }

    /// The path of the file currently written.
    pub fn current_file(&self) -> &Path {
        &self.state.current_path
    }

    /// The path of the link to the current file, if links are enabled.
    pub fn link_file(&self) -> Option<PathBuf> {
        self.state.link.then(|| self.state.link_path())
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let now = self.state.clock.now();
        if self.state.should_rollover(&now) {
            self.state.advance(&now);
            self.state.refresh_writer(&now, &mut self.writer);
        }
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    rotation: Rotation,
    max_age: Duration,
    link: bool,
    clock: Clock,
}

impl Default for RollingFileWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`] with daily rotation, seven days of retention and
    /// the link enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rotation: Rotation::Daily,
            max_age: DEFAULT_MAX_AGE,
            link: true,
            clock: Clock::System,
        }
    }

    /// Sets the rotation period.
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets how long rotated files are kept, judged by their modification time.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Sets whether the `<app_name>.log` link to the current file is maintained.
    #[must_use]
    pub fn link(mut self, link: bool) -> Self {
        self.link = link;
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileWriter`], opening the file of the current period in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `app_name` is empty or contains a path separator, or if the directory,
    /// the file, or the link cannot be created.
    pub fn build(
        self,
        dir: impl AsRef<Path>,
        app_name: impl Into<String>,
    ) -> Result<RollingFileWriter, Error> {
        let Self {
            rotation,
            max_age,
            link,
            clock,
        } = self;

        let app_name = app_name.into();
        if app_name.is_empty() || app_name.contains(['/', '\\']) {
            return Err(Error::new("invalid app name for log files").with_context("app", app_name));
        }

        let log_dir = dir.as_ref().to_path_buf();
        let (state, writer) = State::new(log_dir, app_name, rotation, max_age, link, clock)?;
        Ok(RollingFileWriter { state, writer })
    }
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    app_name: String,
    rotation: Rotation,
    max_age: Duration,
    link: bool,
    current_path: PathBuf,
    next_rollover: Option<Timestamp>,
    clock: Clock,
}

impl State {
    fn new(
        log_dir: PathBuf,
        app_name: String,
        rotation: Rotation,
        max_age: Duration,
        link: bool,
        clock: Clock,
    ) -> Result<(Self, File), Error> {
        fs::create_dir_all(&log_dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("dir", log_dir.display())
                .with_source(err)
        })?;

        let now = clock.now();
        let next_rollover = rotation.next_rollover(&now);
        let mut state = State {
            log_dir,
            app_name,
            rotation,
            max_age,
            link,
            current_path: PathBuf::new(),
            next_rollover,
            clock,
        };
        state.current_path = state.log_dir.join(state.file_name(&now));

        let file = open_file(&state.current_path)?;
        if state.link {
            state.update_link()?;
        }
        if let Err(err) = state.purge_expired(&now) {
            eprintln!("failed to purge expired logs: {err}");
        }
        Ok((state, file))
    }

    fn file_name(&self, now: &Zoned) -> String {
        let stamp = now.strftime(self.rotation.date_format());
        format!("{}_{stamp}.log", self.app_name)
    }

    fn link_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.app_name))
    }

    fn should_rollover(&self, now: &Zoned) -> bool {
        self.next_rollover.is_some_and(|ts| now.timestamp() >= ts)
    }

    fn advance(&mut self, now: &Zoned) {
        self.next_rollover = self.rotation.next_rollover(now);
    }

    fn refresh_writer(&mut self, now: &Zoned, file: &mut File) {
        let path = self.log_dir.join(self.file_name(now));
        match open_file(&path) {
            Ok(new_file) => {
                if let Err(err) = file.flush() {
                    eprintln!("failed to flush previous writer: {err}");
                }
                *file = new_file;
                self.current_path = path;
            }
            Err(err) => {
                eprintln!("failed to create writer for logs: {err}");
                return;
            }
        }

        if self.link {
            if let Err(err) = self.update_link() {
                eprintln!("failed to update log link: {err}");
            }
        }
        if let Err(err) = self.purge_expired(now) {
            eprintln!("failed to purge expired logs: {err}");
        }
    }

    // Create the new link next to the old one and rename it over, so the link never dangles.
    fn update_link(&self) -> Result<(), Error> {
        let link = self.link_path();
        let tmp = self.log_dir.join(format!(".{}.log.tmp", self.app_name));

        let _ = fs::remove_file(&tmp);
        create_link(&self.current_path, &tmp)
            .and_then(|()| fs::rename(&tmp, &link))
            .map_err(|err| {
                Error::new("failed to link current log file")
                    .with_context("link", link.display())
                    .with_context("target", self.current_path.display())
                    .with_source(err)
            })
    }

    fn purge_expired(&self, now: &Zoned) -> Result<(), Error> {
        let Some(cutoff) = SystemTime::from(now.timestamp()).checked_sub(self.max_age) else {
            return Ok(());
        };

        let read_dir = fs::read_dir(&self.log_dir).map_err(|err| {
            Error::new("failed to read log dir")
                .with_context("dir", self.log_dir.display())
                .with_source(err)
        })?;

        let prefix = format!("{}_", self.app_name);
        let expired = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;

                // only rotated files; never the link, a directory, or the file being written
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }
                let path = entry.path();
                if path == self.current_path {
                    return None;
                }

                let filename = entry.file_name();
                let stamp = filename
                    .to_str()?
                    .strip_prefix(&prefix)?
                    .strip_suffix(".log")?;
                if !self.rotation.is_stamp(stamp) {
                    return None;
                }

                let modified = entry.metadata().ok()?.modified().ok()?;
                (modified < cutoff).then_some(path)
            })
            .collect::<Vec<_>>();

        remove_files(expired, |path| fs::remove_file(path))
    }
}

// Every path is attempted; a failure on one never keeps the others around.
fn remove_files(
    paths: Vec<PathBuf>,
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) -> Result<(), Error> {
    let mut failure: Option<Error> = None;
    for path in paths {
        if let Err(err) = remove(&path) {
            failure = Some(match failure {
                Some(failure) => failure.with_context("file", path.display()),
                None => Error::new("failed to remove expired log files")
                    .with_context("file", path.display())
                    .with_source(err),
            });
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn open_file(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| {
            Error::new("failed to create log file")
                .with_context("file", path.display())
                .with_source(err)
        })
}

#[cfg(unix)]
fn create_link(original: &Path, link: &Path) -> io::Result<()> {
    // relative to the directory holding both
    let target = original.file_name().map(Path::new).unwrap_or(original);
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_link(original: &Path, link: &Path) -> io::Result<()> {
    fs::hard_link(original, link)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use std::time::SystemTime;

    use jiff::ToSpan;
    use jiff::Zoned;
    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;

    fn zoned(s: &str) -> Zoned {
        s.parse().unwrap()
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    fn touch(path: &Path, modified: &Zoned) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::from(modified.timestamp()))
            .unwrap();
    }

    fn generate_random_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        std::iter::repeat(())
            .map(|()| rng.sample(Alphanumeric))
            .map(char::from)
            .take(len)
            .collect()
    }

    #[test]
    fn test_daily_rollover_across_25_hours() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let start = zoned("2024-08-10T00:00:00[UTC]");
        let mut writer = RollingFileWriter::builder()
            .clock(Clock::Manual(start))
            .build(&temp_dir, "app")
            .unwrap();

        for hour in 0..25 {
            if hour > 0 {
                writer.state.clock.advance(1.hour());
            }
            writeln!(writer, "line {hour}").unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(
            file_names(temp_dir.path()),
            vec!["app.log", "app_20240810.log", "app_20240811.log"]
        );
        assert_eq!(
            writer.current_file(),
            temp_dir.path().join("app_20240811.log")
        );

        let first = fs::read_to_string(temp_dir.path().join("app_20240810.log")).unwrap();
        assert_eq!(first.lines().count(), 24);
        assert_eq!(first.lines().last(), Some("line 23"));

        let link = writer.link_file().unwrap();
        assert_eq!(fs::read_to_string(link).unwrap(), "line 24\n");
        #[cfg(unix)]
        assert_eq!(
            fs::read_link(temp_dir.path().join("app.log")).unwrap(),
            Path::new("app_20240811.log")
        );
    }

    #[test]
    fn test_link_follows_every_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = RollingFileWriter::builder()
            .rotation(Rotation::Hourly)
            .clock(Clock::Manual(zoned("2024-08-10T10:30:00[UTC]")))
            .build(&temp_dir, "svc")
            .unwrap();

        let link = temp_dir.path().join("svc.log");
        for hour in 10..14 {
            let data = format!("written at {hour}\n");
            writer.write_all(data.as_bytes()).unwrap();
            writer.flush().unwrap();
            assert_eq!(fs::read_to_string(&link).unwrap(), data);
            writer.state.clock.advance(1.hour());
        }
        assert!(!temp_dir.path().join(".svc.log.tmp").exists());
    }

    #[test]
    fn test_file_rolling_via_time_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = RollingFileWriter::builder()
            .rotation(Rotation::Hourly)
            .link(false)
            .clock(Clock::Manual(zoned("2024-08-10T00:00:00[UTC]")))
            .build(&temp_dir, "test_prefix")
            .unwrap();

        let mut expected_total = 0;
        for _ in 0..(5 * 6) {
            let rand_str = generate_random_string();
            expected_total += rand_str.len();
            assert_eq!(writer.write(rand_str.as_bytes()).unwrap(), rand_str.len());
            writer.state.clock.advance(10.minutes());
        }
        writer.flush().unwrap();

        let names = file_names(temp_dir.path());
        assert_eq!(
            names,
            vec![
                "test_prefix_2024081000.log",
                "test_prefix_2024081001.log",
                "test_prefix_2024081002.log",
                "test_prefix_2024081003.log",
                "test_prefix_2024081004.log",
            ]
        );
        let total = names
            .iter()
            .map(|name| fs::metadata(temp_dir.path().join(name)).unwrap().len() as usize)
            .sum::<usize>();
        assert_eq!(total, expected_total);
    }

    #[test]
    fn test_expired_files_are_purged() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let dir = temp_dir.path();

        let old = zoned("2024-08-01T12:00:00[UTC]");
        let recent = zoned("2024-08-09T12:00:00[UTC]");

        touch(&dir.join("app_20240801.log"), &old);
        touch(&dir.join("app_20240809.log"), &recent);
        // not ours, even though they are old
        touch(&dir.join("other_20240801.log"), &old);
        touch(&dir.join("app_notes.log"), &old);
        touch(&dir.join("app_20240801.txt"), &old);

        let mut writer = RollingFileWriter::builder()
            .clock(Clock::Manual(zoned("2024-08-10T12:00:00[UTC]")))
            .build(dir, "app")
            .unwrap();
        assert_eq!(
            file_names(dir),
            vec![
                "app.log",
                "app_20240801.txt",
                "app_20240809.log",
                "app_20240810.log",
                "app_notes.log",
                "other_20240801.log",
            ]
        );

        // a week after the 9th has passed, the next rotation drops it
        writer
            .state
            .clock
            .set_now(zoned("2024-08-17T01:00:00[UTC]"));
        writer.write_all(b"a week later\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(
            file_names(dir),
            vec![
                "app.log",
                "app_20240801.txt",
                "app_20240810.log",
                "app_20240817.log",
                "app_notes.log",
                "other_20240801.log",
            ]
        );
    }

    #[test]
    fn test_reopen_appends_to_current_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let now = zoned("2024-08-10T08:00:00[UTC]");

        for line in ["first\n", "second\n"] {
            let mut writer = RollingFileWriter::builder()
                .clock(Clock::Manual(now.clone()))
                .build(&temp_dir, "app")
                .unwrap();
            writer.write_all(line.as_bytes()).unwrap();
            writer.flush().unwrap();
        }

        let content = fs::read_to_string(temp_dir.path().join("app_20240810.log")).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_build_errors() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");

        let err = RollingFileWriter::builder()
            .build(&temp_dir, "")
            .unwrap_err();
        assert_eq!(err.message(), "invalid app name for log files");

        let err = RollingFileWriter::builder()
            .build(&temp_dir, "nested/app")
            .unwrap_err();
        assert_eq!(err.message(), "invalid app name for log files");

        let not_a_dir = temp_dir.path().join("not_a_dir");
        fs::write(&not_a_dir, b"").unwrap();
        let err = RollingFileWriter::builder()
            .build(&not_a_dir, "app")
            .unwrap_err();
        assert_eq!(err.message(), "failed to create log directory");
    }

    #[test]
    fn test_removal_failure_does_not_stop_purge() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let paths = (1..=9)
            .map(|day| temp_dir.path().join(format!("app_2024080{day}.log")))
            .collect::<Vec<_>>();
        for path in &paths {
            fs::write(path, b"old").unwrap();
        }
        let stuck = temp_dir.path().join("app_20240805.log");

        let err = remove_files(paths, |path| {
            if path == stuck {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "immutable"))
            } else {
                fs::remove_file(path)
            }
        })
        .unwrap_err();

        assert_eq!(err.message(), "failed to remove expired log files");
        assert!(err.to_string().contains("app_20240805.log"), "{err}");
        assert_eq!(file_names(temp_dir.path()), vec!["app_20240805.log"]);
    }
}
