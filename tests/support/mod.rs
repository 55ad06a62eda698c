//! In-process mock store speaking enough RESP2 for the integration
//! tests: strings, lists, sets, key-space and server commands, optional
//! AUTH, and per-connection database selection.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::sync::{Arc, Once};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use kv_middleware::options::{self, Opt};

const DB_COUNT: usize = 16;

#[derive(Clone)]
enum Value {
    Str(String),
    List(VecDeque<String>),
    Set(HashSet<String>),
}

type Db = HashMap<String, Value>;
type Shared = Arc<Mutex<Vec<Db>>>;

/// One running mock store. Dropping it aborts the accept loop.
pub struct MockStore {
    port: u16,
    handle: JoinHandle<()>,
}

impl MockStore {
    pub async fn spawn() -> Self {
        Self::spawn_with_password(None).await
    }

    pub async fn spawn_with_password(password: Option<&str>) -> Self {
        init_test_logging();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock store");
        let port = listener.local_addr().expect("local addr").port();
        let dbs: Shared = Arc::new(Mutex::new(vec![Db::new(); DB_COUNT]));
        let password = password.map(String::from);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(session(stream, Arc::clone(&dbs), password.clone()));
            }
        });
        MockStore { port, handle }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Options pointing a client at this store.
    pub fn opts(&self) -> Vec<Opt> {
        vec![options::host("127.0.0.1"), options::port(self.port)]
    }
}

impl Drop for MockStore {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

async fn session(stream: TcpStream, dbs: Shared, password: Option<String>) {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    let mut selected = 0usize;
    let mut authed = password.is_none();

    loop {
        let args = match read_command(&mut reader, &mut line).await {
            Ok(Some(args)) if !args.is_empty() => args,
            _ => return,
        };
        let name = args[0].to_ascii_uppercase();
        let stream = reader.get_mut();

        if name == "AUTH" {
            let reply = match (&password, args.get(1)) {
                (Some(expected), Some(given)) if expected == given => {
                    authed = true;
                    Reply::Ok
                }
                (Some(_), _) => Reply::Err("ERR invalid password".into()),
                (None, _) => Reply::Err("ERR Client sent AUTH, but no password is set".into()),
            };
            if write_reply(stream, reply).await.is_err() {
                return;
            }
            continue;
        }
        if !authed {
            if write_reply(stream, Reply::Err("NOAUTH Authentication required".into()))
                .await
                .is_err()
            {
                return;
            }
            continue;
        }

        let reply = match name.as_str() {
            "SELECT" => match args.get(1).and_then(|a| a.parse::<usize>().ok()) {
                Some(idx) if idx < DB_COUNT => {
                    selected = idx;
                    Reply::Ok
                }
                _ => Reply::Err("ERR invalid DB index".into()),
            },
            "PING" => match args.get(1) {
                Some(msg) => Reply::Bulk(msg.clone()),
                None => Reply::Simple("PONG".into()),
            },
            "ECHO" => match args.get(1) {
                Some(msg) => Reply::Bulk(msg.clone()),
                None => Reply::Err("ERR wrong number of arguments".into()),
            },
            "QUIT" => {
                let _ = write_reply(stream, Reply::Ok).await;
                return;
            }
            _ => {
                let mut dbs = dbs.lock().await;
                apply(&mut dbs, selected, &name, &args[1..])
            }
        };
        if write_reply(stream, reply).await.is_err() {
            return;
        }
    }
}

/// Apply one data command to the store.
fn apply(dbs: &mut [Db], selected: usize, name: &str, args: &[String]) -> Reply {
    let db = &mut dbs[selected];
    match name {
        "GET" => match db.get(&args[0]) {
            Some(Value::Str(s)) => Reply::Bulk(s.clone()),
            Some(_) => wrong_type(),
            None => Reply::Nil,
        },
        "SET" => {
            db.insert(args[0].clone(), Value::Str(args[1].clone()));
            Reply::Ok
        }
        "SETEX" => match args[1].parse::<u64>() {
            Ok(secs) if secs > 0 => {
                db.insert(args[0].clone(), Value::Str(args[2].clone()));
                Reply::Ok
            }
            _ => Reply::Err("ERR invalid expire time in 'setex' command".into()),
        },
        "APPEND" => {
            let entry = db
                .entry(args[0].clone())
                .or_insert_with(|| Value::Str(String::new()));
            match entry {
                Value::Str(s) => {
                    s.push_str(&args[1]);
                    Reply::Int(s.len() as i64)
                }
                _ => wrong_type(),
            }
        }
        "INCR" => {
            let current = match db.get(&args[0]) {
                Some(Value::Str(s)) => match s.parse::<i64>() {
                    Ok(n) => n,
                    Err(_) => {
                        return Reply::Err("ERR value is not an integer or out of range".into());
                    }
                },
                Some(_) => return wrong_type(),
                None => 0,
            };
            let next = current + 1;
            db.insert(args[0].clone(), Value::Str(next.to_string()));
            Reply::Int(next)
        }
        "MGET" => Reply::Array(
            args.iter()
                .map(|key| match db.get(key) {
                    Some(Value::Str(s)) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
        ),
        "DEL" => Reply::Int(args.iter().filter(|key| db.remove(*key).is_some()).count() as i64),
        "EXISTS" => Reply::Int(i64::from(db.contains_key(&args[0]))),
        "EXPIRE" => Reply::Int(i64::from(db.contains_key(&args[0]))),
        "KEYS" => {
            let mut keys: Vec<String> = db
                .keys()
                .filter(|key| glob(&args[0], key))
                .cloned()
                .collect();
            keys.sort();
            Reply::Array(keys.into_iter().map(Some).collect())
        }
        "RENAME" => match db.remove(&args[0]) {
            Some(value) => {
                db.insert(args[1].clone(), value);
                Reply::Ok
            }
            None => Reply::Err("ERR no such key".into()),
        },
        "LLEN" => match db.get(&args[0]) {
            Some(Value::List(items)) => Reply::Int(items.len() as i64),
            Some(_) => wrong_type(),
            None => Reply::Int(0),
        },
        "LPUSH" | "RPUSH" => {
            let entry = db
                .entry(args[0].clone())
                .or_insert_with(|| Value::List(VecDeque::new()));
            match entry {
                Value::List(items) => {
                    for item in &args[1..] {
                        if name == "LPUSH" {
                            items.push_front(item.clone());
                        } else {
                            items.push_back(item.clone());
                        }
                    }
                    Reply::Int(items.len() as i64)
                }
                _ => wrong_type(),
            }
        }
        "LPOP" | "RPOP" => match db.get_mut(&args[0]) {
            Some(Value::List(items)) => {
                let popped = if name == "LPOP" {
                    items.pop_front()
                } else {
                    items.pop_back()
                };
                match popped {
                    Some(item) => Reply::Bulk(item),
                    None => Reply::Nil,
                }
            }
            Some(_) => wrong_type(),
            None => Reply::Nil,
        },
        "SADD" => {
            let entry = db
                .entry(args[0].clone())
                .or_insert_with(|| Value::Set(HashSet::new()));
            match entry {
                Value::Set(members) => {
                    let added = args[1..]
                        .iter()
                        .filter(|member| members.insert((*member).clone()))
                        .count();
                    Reply::Int(added as i64)
                }
                _ => wrong_type(),
            }
        }
        "SCARD" => match db.get(&args[0]) {
            Some(Value::Set(members)) => Reply::Int(members.len() as i64),
            Some(_) => wrong_type(),
            None => Reply::Int(0),
        },
        "SMEMBERS" => match db.get(&args[0]) {
            Some(Value::Set(members)) => {
                let mut members: Vec<String> = members.iter().cloned().collect();
                members.sort();
                Reply::Array(members.into_iter().map(Some).collect())
            }
            Some(_) => wrong_type(),
            None => Reply::Array(Vec::new()),
        },
        "SDIFFSTORE" | "SUNIONSTORE" => {
            let mut result = set_at(db, &args[1]);
            for key in &args[2..] {
                let other = set_at(db, key);
                if name == "SDIFFSTORE" {
                    result.retain(|member| !other.contains(member));
                } else {
                    result.extend(other);
                }
            }
            let card = result.len() as i64;
            if result.is_empty() {
                db.remove(&args[0]);
            } else {
                db.insert(args[0].clone(), Value::Set(result));
            }
            Reply::Int(card)
        }
        "DBSIZE" => Reply::Int(db.len() as i64),
        "FLUSHDB" => {
            db.clear();
            Reply::Ok
        }
        "FLUSHALL" => {
            for db in dbs.iter_mut() {
                db.clear();
            }
            Reply::Ok
        }
        other => Reply::Err(format!("ERR unknown command '{other}'")),
    }
}

fn set_at(db: &Db, key: &str) -> HashSet<String> {
    match db.get(key) {
        Some(Value::Set(members)) => members.clone(),
        _ => HashSet::new(),
    }
}

fn wrong_type() -> Reply {
    Reply::Err("WRONGTYPE Operation against a key holding the wrong kind of value".into())
}

fn glob(pattern: &str, key: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return key.starts_with(prefix);
    }
    pattern == key
}

enum Reply {
    Ok,
    Simple(String),
    Err(String),
    Int(i64),
    Bulk(String),
    Nil,
    Array(Vec<Option<String>>),
}

async fn write_reply(stream: &mut TcpStream, reply: Reply) -> io::Result<()> {
    let mut out = Vec::new();
    render(&reply, &mut out);
    stream.write_all(&out).await?;
    stream.flush().await
}

fn render(reply: &Reply, out: &mut Vec<u8>) {
    match reply {
        Reply::Ok => out.extend_from_slice(b"+OK\r\n"),
        Reply::Simple(text) => {
            out.extend_from_slice(format!("+{text}\r\n").as_bytes());
        }
        Reply::Err(text) => {
            out.extend_from_slice(format!("-{text}\r\n").as_bytes());
        }
        Reply::Int(value) => {
            out.extend_from_slice(format!(":{value}\r\n").as_bytes());
        }
        Reply::Bulk(data) => {
            out.extend_from_slice(format!("${}\r\n{data}\r\n", data.len()).as_bytes());
        }
        Reply::Nil => out.extend_from_slice(b"$-1\r\n"),
        Reply::Array(items) => {
            out.extend_from_slice(format!("*{}\r\n", items.len()).as_bytes());
            for item in items {
                match item {
                    Some(data) => render(&Reply::Bulk(data.clone()), out),
                    None => render(&Reply::Nil, out),
                }
            }
        }
    }
}

async fn read_command(
    reader: &mut BufReader<TcpStream>,
    line: &mut Vec<u8>,
) -> io::Result<Option<Vec<String>>> {
    line.clear();
    if reader.read_until(b'\n', line).await? == 0 {
        return Ok(None);
    }
    let count = parse_prefix(line, b'*')?;
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        if reader.read_until(b'\n', line).await? == 0 {
            return Ok(None);
        }
        let len = parse_prefix(line, b'$')?;
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data).await?;
        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf).await?;
        let arg = String::from_utf8(data)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-utf8 argument"))?;
        args.push(arg);
    }
    Ok(Some(args))
}

fn parse_prefix(line: &[u8], marker: u8) -> io::Result<usize> {
    if line.first() != Some(&marker) || line.len() < 3 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "bad frame"));
    }
    std::str::from_utf8(&line[1..line.len() - 2])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "bad length"))
}
