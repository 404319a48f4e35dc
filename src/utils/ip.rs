//! IP 地址处理工具
//!
//! 提供统一的客户端 IP 提取功能，限流 key 依赖它：
//! - 可信代理配置（api.trusted_proxies）
//! - CIDR 匹配
//! - 私有 IP 自动检测

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::dev::ConnectionInfo;
use actix_web::http::header::HeaderMap;
use tracing::debug;

use crate::config::get_config;

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// 解析 "ip" 或 "ip:port"
fn parse_ip(ip: &str) -> Option<IpAddr> {
    ip.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| ip.parse::<IpAddr>())
        .ok()
}

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Some(ip_addr) = parse_ip(ip) else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            (u32::from_be_bytes(ip.octets()) & mask) == (u32::from_be_bytes(net.octets()) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            (u128::from_be_bytes(ip.octets()) & mask) == (u128::from_be_bytes(net.octets()) & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 根据连接 IP 与转发头决定客户端 IP
///
/// 策略（按优先级）：
/// 1. 显式配置 trusted_proxies 且 peer 匹配 → 使用转发头
/// 2. 显式配置但不匹配 → 使用 peer（不信任转发头）
/// 3. 未配置且 peer 为私有 IP → 认为前面有反向代理，使用转发头
/// 4. 默认 → peer
pub fn resolve_client_ip(
    peer: Option<&str>,
    forwarded: Option<String>,
    trusted_proxies: &[String],
) -> Option<String> {
    let Some(peer) = peer else {
        return forwarded;
    };
    let peer_ip = parse_ip(peer).map(|ip| ip.to_string());

    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(peer, trusted_proxies) {
            let real_ip = forwarded.or(peer_ip);
            debug!("Trusted proxy (explicit): {} -> {:?}", peer, real_ip);
            return real_ip;
        }
        return peer_ip.or_else(|| Some(peer.to_string()));
    }

    if let Some(ip_addr) = parse_ip(peer)
        && is_private_or_local(&ip_addr)
        && let Some(real_ip) = forwarded
    {
        debug!(
            "Auto-detect proxy (private IP {}): using forwarded IP {}",
            peer, real_ip
        );
        return Some(real_ip);
    }

    peer_ip.or_else(|| Some(peer.to_string()))
}

/// 从 ConnectionInfo + 请求头提取客户端 IP
pub fn extract_client_ip_from_parts(conn_info: &ConnectionInfo, headers: &HeaderMap) -> Option<String> {
    let config = get_config();
    resolve_client_ip(
        conn_info.peer_addr(),
        extract_forwarded_ip_from_headers(headers),
        &config.api.trusted_proxies,
    )
}

/// 从 HttpRequest 提取真实客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_client_ip_from_parts(&req.connection_info(), req.headers())
}

/// 从 HeaderMap 提取转发的 IP（X-Forwarded-For 第一个，其次 X-Real-IP）
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}
