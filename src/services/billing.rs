// src/services/billing.rs

// A Calculadora de Cobrança: funções puras, sem banco e sem relógio
// próprio. O mesmo cálculo atende a prévia ("quanto estou devendo até
// agora?") e o custo final na liberação da vaga.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

const SECONDS_PER_HOUR: i64 = 3600;

// Horas decorridas, fracionárias, com base em segundos de relógio.
// Decorrido negativo (relógio torto) é tratado como zero: uma prévia
// nunca fica abaixo de 0.00.
pub fn elapsed_hours(parking_time: DateTime<Utc>, as_of: DateTime<Utc>) -> Decimal {
    let seconds = (as_of - parking_time).num_seconds().max(0);
    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}

// Cobrança linear pura: sem tarifa mínima, sem arredondar para cima em
// blocos. `round_dp` arredonda para 2 casas no modo "banker's rounding".
pub fn quote(cost_per_hour: Decimal, parking_time: DateTime<Utc>, as_of: DateTime<Utc>) -> Decimal {
    (elapsed_hours(parking_time, as_of) * cost_per_hour).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn inicio() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn custo_no_instante_da_entrada_e_zero() {
        let custo = quote(Decimal::from(10), inicio(), inicio());
        assert_eq!(custo, Decimal::ZERO);
    }

    #[test]
    fn noventa_minutos_a_dez_por_hora_custam_quinze() {
        let saida = inicio() + Duration::minutes(90);
        let custo = quote(Decimal::from(10), inicio(), saida);
        assert_eq!(custo, Decimal::new(1500, 2)); // 15.00
    }

    #[test]
    fn vinte_minutos_a_dez_por_hora_arredondam_para_duas_casas() {
        let saida = inicio() + Duration::minutes(20);
        let custo = quote(Decimal::from(10), inicio(), saida);
        assert_eq!(custo, Decimal::new(333, 2)); // 10/3 = 3.333... -> 3.33
    }

    #[test]
    fn custo_nunca_diminui_com_o_tempo() {
        let tarifa = Decimal::new(750, 2); // 7.50/h
        let mut anterior = Decimal::ZERO;
        for minutos in [0i64, 1, 15, 59, 60, 61, 120, 600, 1440] {
            let custo = quote(tarifa, inicio(), inicio() + Duration::minutes(minutos));
            assert!(custo >= anterior, "custo regrediu em t+{minutos}min");
            anterior = custo;
        }
    }

    #[test]
    fn decorrido_negativo_e_tratado_como_zero() {
        let antes = inicio() - Duration::minutes(5);
        assert_eq!(quote(Decimal::from(10), inicio(), antes), Decimal::ZERO);
    }

    #[test]
    fn um_dia_inteiro_a_tarifa_quebrada() {
        let saida = inicio() + Duration::hours(24);
        let custo = quote(Decimal::new(250, 2), inicio(), saida); // 2.50/h
        assert_eq!(custo, Decimal::new(6000, 2)); // 60.00
    }
}
